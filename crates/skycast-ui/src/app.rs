//! Qt application launcher.

use anyhow::Result;
use cxx_qt_lib::{QGuiApplication, QQmlApplicationEngine, QUrl};

use skycast_core::Config;

use crate::app_services::AppServices;

const MAIN_QML: &str = "qrc:/qt/qml/com/skycast/app/qml/Main.qml";

/// Start services, open the main window and block until it closes.
///
/// # Errors
/// Fails if the application services cannot be initialized or the event
/// loop exits with a nonzero code.
pub fn run(config: Config) -> Result<()> {
    let services = AppServices::init(config)?;

    let mut app = QGuiApplication::new();
    let mut engine = QQmlApplicationEngine::new();

    if let Some(engine) = engine.as_mut() {
        engine.load(&QUrl::from(MAIN_QML));
    }

    let code = match app.as_mut() {
        Some(app) => app.exec(),
        None => {
            services.shutdown();
            anyhow::bail!("Failed to create the Qt application");
        }
    };

    services.shutdown();
    tracing::info!("Event loop exited with code {}", code);
    check_exit_code(code)
}

fn check_exit_code(code: i32) -> Result<()> {
    if code != 0 {
        anyhow::bail!("Qt event loop exited with code {}", code);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonzero_exit_code_is_an_error() {
        assert!(check_exit_code(0).is_ok());

        let err = check_exit_code(3).unwrap_err();
        assert!(err.to_string().contains("code 3"));
        assert!(check_exit_code(-1).is_err());
    }
}
