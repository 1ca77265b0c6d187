#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiLocale {
    EnUs,
    RuRu,
}

impl UiLocale {
    pub fn from_opt(value: Option<&str>) -> Self {
        let normalized = value
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
            .replace('-', "_");
        if normalized == "ru" || normalized.starts_with("ru_") {
            Self::RuRu
        } else {
            Self::EnUs
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::EnUs => "en_US",
            Self::RuRu => "ru_RU",
        }
    }

    pub fn text<'a>(self, en: &'a str, ru: &'a str) -> &'a str {
        if matches!(self, Self::RuRu) {
            ru
        } else {
            en
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_detection() {
        assert_eq!(UiLocale::from_opt(None), UiLocale::EnUs);
        assert_eq!(UiLocale::from_opt(Some("ru")), UiLocale::RuRu);
        assert_eq!(UiLocale::from_opt(Some("ru-RU")), UiLocale::RuRu);
        assert_eq!(UiLocale::from_opt(Some("de_DE")), UiLocale::EnUs);
        assert_eq!(UiLocale::RuRu.text("Error", "Ошибка"), "Ошибка");
    }
}
