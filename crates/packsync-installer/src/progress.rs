/// Hooks the reconcile run calls while installing entries.
pub trait ProgressObserver {
    fn install_started(&self, _total: usize) {}

    fn entry_finished(&self, _name: &str, _succeeded: bool) {}

    fn install_finished(&self) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {}
