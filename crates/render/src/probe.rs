use outs_core::PlatformCapabilities;

/// Inspects the host once. A clipboard that opens is treated as writable
/// without a gesture; anything else falls back to the manual preview route.
pub fn probe_platform() -> PlatformCapabilities {
    #[cfg(feature = "system-clipboard")]
    {
        match arboard::Clipboard::new() {
            Ok(_) => {
                log::info!("system clipboard available, copying unattended");
                PlatformCapabilities::UNATTENDED
            }
            Err(err) => {
                log::warn!("system clipboard unavailable ({err}), falling back to preview");
                PlatformCapabilities::MANUAL
            }
        }
    }
    #[cfg(not(feature = "system-clipboard"))]
    {
        log::info!("built without clipboard support, falling back to preview");
        PlatformCapabilities::MANUAL
    }
}
