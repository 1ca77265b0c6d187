use crate::app::{App, DrawAction};
use crate::locale::UiLocale;
use outs_core::{NoticeKind, Notification};
use outs_render::{ClipboardSink, ImageLoader, ManualAction, PendingCopy};
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Draw(DrawAction),
    /// `select` with no numbers; the loop prompts for them.
    SelectPrompt,
    Outs,
    /// Repeats the most recent notification.
    Last,
    NewRound,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_command(line: &str) -> ReplCommand {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    match head.to_ascii_lowercase().as_str() {
        "" => ReplCommand::Empty,
        "i" | "initial" | "start" => ReplCommand::Draw(DrawAction::Initial),
        "a" | "addon" | "add" => ReplCommand::Draw(DrawAction::Addon),
        "s" | "select" | "selected" => {
            if rest.is_empty() {
                ReplCommand::SelectPrompt
            } else {
                ReplCommand::Draw(DrawAction::Selected(rest.to_string()))
            }
        }
        "ls" | "outs" => ReplCommand::Outs,
        "last" => ReplCommand::Last,
        "new" | "reset" => ReplCommand::NewRound,
        "h" | "help" | "?" => ReplCommand::Help,
        "q" | "quit" | "exit" => ReplCommand::Quit,
        other => ReplCommand::Unknown(other.to_string()),
    }
}

pub async fn run_repl<L, S>(
    app: &mut App<L, S>,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<()>
where
    L: ImageLoader,
    S: ClipboardSink,
{
    print_help(app.locale, output)?;
    loop {
        write!(output, "> ")?;
        output.flush()?;
        let Some(line) = read_line(input)? else {
            break;
        };
        match parse_command(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Quit => break,
            ReplCommand::Help => print_help(app.locale, output)?,
            ReplCommand::Outs => print_outs(app, output)?,
            ReplCommand::Last => {
                let last = app.session.notices().display().clone();
                if !last.text.is_empty() {
                    write_notice(&last, output)?;
                }
            }
            ReplCommand::NewRound => confirm_new_round(app, input, output)?,
            ReplCommand::SelectPrompt => {
                write!(
                    output,
                    "{} ",
                    app.locale.text("Card numbers:", "Список номеров:")
                )?;
                output.flush()?;
                let numbers = read_line(input)?.unwrap_or_default();
                run_action(app, DrawAction::Selected(numbers), input, output).await?;
            }
            ReplCommand::Draw(action) => run_action(app, action, input, output).await?,
            ReplCommand::Unknown(command) => writeln!(
                output,
                "{} {command}",
                app.locale.text("unknown command:", "неизвестная команда:")
            )?,
        }
    }
    Ok(())
}

pub async fn run_action<L, S>(
    app: &mut App<L, S>,
    action: DrawAction,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<()>
where
    L: ImageLoader,
    S: ClipboardSink,
{
    if let Some(pending) = app.run(action).await {
        settle_pending(app, pending, input, output)?;
    }
    print_notice(app, output)
}

/// Walks the user through a copy the platform could not do on its own.
pub fn settle_pending<L, S>(
    app: &mut App<L, S>,
    pending: PendingCopy,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<()>
where
    L: ImageLoader,
    S: ClipboardSink,
{
    let locale = app.locale;
    writeln!(output, "{}", pending.url())?;
    match pending.action() {
        ManualAction::ConfirmWrite => {
            write!(
                output,
                "{} ",
                locale.text(
                    "Press Enter to copy, or type 'cancel':",
                    "Нажми Enter, чтобы скопировать, или введи 'cancel':"
                )
            )?;
            output.flush()?;
            let confirmed = matches!(read_line(input)?, Some(answer) if answer.trim().is_empty());
            app.resolve(pending, confirmed);
        }
        ManualAction::SaveFromPreview => {
            write!(
                output,
                "{} ",
                locale.text(
                    "Copy it! Open the image above, copy it, then press Enter.",
                    "Скопируй! Открой картинку выше, скопируй её и нажми Enter."
                )
            )?;
            output.flush()?;
            read_line(input)?;
            app.resolve(pending, false);
        }
    }
    Ok(())
}

fn confirm_new_round<L, S>(
    app: &mut App<L, S>,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<()>
where
    L: ImageLoader,
    S: ClipboardSink,
{
    write!(output, "{} [y/N] ", app.locale.text("Sure?", "Точно?"))?;
    output.flush()?;
    let answer = read_line(input)?.unwrap_or_default();
    if matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes" | "д" | "да") {
        app.new_round();
        writeln!(output, "{}", app.locale.text("New round started", "Новый раунд"))?;
    }
    Ok(())
}

pub fn print_outs<L, S>(app: &App<L, S>, output: &mut impl Write) -> io::Result<()>
where
    L: ImageLoader,
    S: ClipboardSink,
{
    let outs = app.session.outs();
    if outs.is_empty() {
        return writeln!(
            output,
            "{}",
            app.locale.text("No cards out yet", "Карты ещё не выходили")
        );
    }
    let list: Vec<String> = outs.as_slice().iter().map(ToString::to_string).collect();
    writeln!(
        output,
        "{} {}",
        app.locale.text("Cards out:", "Вышедшие карты:"),
        list.join(", ")
    )
}

fn print_notice<L, S>(app: &mut App<L, S>, output: &mut impl Write) -> io::Result<()>
where
    L: ImageLoader,
    S: ClipboardSink,
{
    match app.session.take_notice() {
        Some(notice) => write_notice(&notice, output),
        None => Ok(()),
    }
}

fn write_notice(notice: &Notification, output: &mut impl Write) -> io::Result<()> {
    let tag = match notice.kind {
        NoticeKind::Success => "[ok]",
        NoticeKind::Error => "[error]",
    };
    writeln!(output, "{tag} {}", notice.text)
}

fn print_help(locale: UiLocale, output: &mut impl Write) -> io::Result<()> {
    writeln!(
        output,
        "{}",
        locale.text(
            "commands: i (6 from the deck), a (1 more), s <numbers> (re-copy cards out), ls, last, new, help, quit",
            "команды: i (6 из колоды), a (1 из колоды, добор), s <номера> (выбранные на тур), ls, last, new, help, quit"
        )
    )
}

fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_app;
    use outs_core::PlatformCapabilities;
    use std::io::Cursor;

    #[test]
    fn parse_known_commands() {
        assert_eq!(parse_command("i"), ReplCommand::Draw(DrawAction::Initial));
        assert_eq!(parse_command("  addon "), ReplCommand::Draw(DrawAction::Addon));
        assert_eq!(
            parse_command("s 5, 7-9"),
            ReplCommand::Draw(DrawAction::Selected("5, 7-9".to_string()))
        );
        assert_eq!(parse_command("select"), ReplCommand::SelectPrompt);
        assert_eq!(parse_command("LS"), ReplCommand::Outs);
        assert_eq!(parse_command("last"), ReplCommand::Last);
        assert_eq!(parse_command(""), ReplCommand::Empty);
        assert_eq!(
            parse_command("shuffle"),
            ReplCommand::Unknown("shuffle".to_string())
        );
    }

    #[tokio::test]
    async fn scripted_session() {
        let mut app = test_app(PlatformCapabilities::UNATTENDED, false);
        let mut input = Cursor::new("i\na\nlast\nls\nnew\ny\nls\nq\n");
        let mut output = Vec::new();
        run_repl(&mut app, &mut input, &mut output)
            .await
            .expect("repl");
        let text = String::from_utf8(output).expect("utf8");
        assert_eq!(text.matches("[ok] Cards copied to the clipboard!").count(), 3);
        assert!(text.contains("Cards out:"));
        assert!(text.contains("No cards out yet"));
        assert!(app.session.outs().is_empty());
    }

    #[tokio::test]
    async fn gesture_copy_can_be_cancelled() {
        let mut app = test_app(PlatformCapabilities::GESTURE, false);
        let mut input = Cursor::new("cancel\n");
        let mut output = Vec::new();
        run_action(&mut app, DrawAction::Addon, &mut input, &mut output)
            .await
            .expect("action");
        let text = String::from_utf8(output).expect("utf8");
        assert!(text.contains("file://"));
        assert!(!text.contains("[ok]"));
        assert!(!app.session.is_busy());
        assert_eq!(app.session.outs().len(), 1);
    }

    #[tokio::test]
    async fn gesture_copy_confirmed_with_enter() {
        let mut app = test_app(PlatformCapabilities::GESTURE, false);
        let mut input = Cursor::new("\n");
        let mut output = Vec::new();
        run_action(&mut app, DrawAction::Initial, &mut input, &mut output)
            .await
            .expect("action");
        let text = String::from_utf8(output).expect("utf8");
        assert!(text.contains("[ok] Cards copied to the clipboard!"));
    }
}
