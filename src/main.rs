#![windows_subsystem = "windows"]

fn main() {
    if let Err(e) = phantty::core::app::run() {
        let _ = std::fs::write("phantty_error.log", format!("{e:?}"));
    }
}
