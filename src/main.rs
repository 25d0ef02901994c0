// Release builds run as a GUI application (no console window).
// Debug builds keep the console so that log output is visible.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

#[cfg(windows)]
fn main() {
    use minwin32::{config::AppConfig, logging, platform::win32};

    let config = AppConfig::load_or_default();
    // Held until exit so buffered file output is flushed.
    let _log = match logging::init(&config.log, "sample") {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("logging disabled: {e}");
            None
        }
    };

    let result = minwin32::App::new(sample::Sample, config).run(&win32::Win32Platform::new());
    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!("startup failed: {e}");
            // The only output path a GUI-subsystem process is sure to have.
            win32::show_error_dialog("MinWin32", &e.to_string());
            std::process::exit(1);
        }
    }
}

#[cfg(not(windows))]
fn main() {
    eprintln!("minwin32-sample only runs on Windows");
    std::process::exit(1);
}

#[cfg(windows)]
mod sample {
    use minwin32::{
        platform::win32::{create_window, with_window},
        AppDelegate, KeyEvent, KeyPressEvent, KeyboardDelegate,
        LaunchContext, LoopHandle, Result, Size, Window, WindowHandler, WindowOptions,
    };

    pub struct Sample;

    impl AppDelegate for Sample {
        fn app_did_launch(&mut self, context: &LaunchContext<'_>) -> Result<()> {
            let options = WindowOptions::new("Sample Window", Size::new(800, 600)).centered();
            let handler = MainWindow {
                quit: context.loop_handle().clone(),
            };
            let handle = create_window(context, &options, handler)?;
            with_window(handle, |window| window.keyboard_mut().set_delegate(KeyLogger));
            Ok(())
        }

        fn app_did_move_to_background(&mut self) {
            tracing::debug!("moved to background");
        }

        fn app_did_move_to_foreground(&mut self) {
            tracing::debug!("moved to foreground");
        }
    }

    struct MainWindow {
        quit: LoopHandle,
    }

    impl WindowHandler for MainWindow {
        fn on_close(&mut self, _window: &mut Window) {
            self.quit.request_quit(0);
        }

        fn on_resize(&mut self, window: &mut Window, size: Size) {
            tracing::trace!(width = size.width, height = size.height, "resized");
            window.set_needs_display();
        }
    }

    struct KeyLogger;

    impl KeyboardDelegate for KeyLogger {
        fn on_key_down(&mut self, event: KeyEvent) {
            tracing::info!(key = event.key_code.vk(), modifiers = ?event.modifiers, "key down");
        }

        fn on_key_press(&mut self, event: KeyPressEvent) {
            tracing::info!(ch = %event.key_char, "key press");
        }
    }
}
