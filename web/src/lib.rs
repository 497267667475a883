mod app;

pub use app::run_app;
