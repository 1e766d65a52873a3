#[derive(Debug, Clone)]
pub enum AppEvent {
    ActiveChanged(usize),
    ConfigReload,
}
