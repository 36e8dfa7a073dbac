//! 具体展示渠道实现

pub mod console;
pub mod desktop;

pub use console::ConsolePresenter;
pub use desktop::DesktopPresenter;
