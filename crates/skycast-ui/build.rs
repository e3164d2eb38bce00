use cxx_qt_build::{CxxQtBuilder, QmlModule};

fn main() {
    CxxQtBuilder::new_qml_module(QmlModule::new("com.skycast.app").qml_file("qml/Main.qml"))
        .file("src/models/weather_model.rs")
        .build();
}
