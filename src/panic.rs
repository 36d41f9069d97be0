use std::panic::PanicInfo;

/// The custom panic hook.
///
/// Panics are reported through the logger, along with the location they originated from and
/// the name of the panicking thread.
fn custom_panic_hook(info: &PanicInfo) {
    let message = info
        .payload()
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
        .unwrap_or("no further information");

    let thread = std::thread::current();
    let thread = thread.name().unwrap_or("<unnamed>");

    match info.location() {
        Some(location) => sprawl_log::error!(
            "thread '{thread}' panicked: {message} (at {}:{}:{})",
            location.file(),
            location.line(),
            location.column(),
        ),
        None => sprawl_log::error!("thread '{thread}' panicked: {message}"),
    }
}

/// Installs the custom panic hook.
pub fn install_custom_panic_hook() {
    sprawl_log::trace!("installing custom panic hook...");
    std::panic::set_hook(Box::new(custom_panic_hook));
}
