pub mod chat;
pub mod demo;
pub mod presentation;
pub mod shared;
pub mod sidebar;
pub mod startup;

pub use chat::ChatView;
pub use demo::DemoView;
pub use sidebar::Sidebar;
pub use startup::StartupScreen;
