/// Undo handle for instrumentation installed by a plugin's `monitor`
///
/// Restores the host state when uninstalled or dropped, whichever comes first.
pub struct InstrumentationGuard {
    name: String,
    restore: Option<Box<dyn FnOnce() + Send>>,
}

impl InstrumentationGuard {
    pub fn new<F>(name: impl Into<String>, restore: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            name: name.into(),
            restore: Some(Box::new(restore)),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uninstall(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(restore) = self.restore.take() {
            log::debug!("Uninstalling instrumentation for '{}'", self.name);
            restore();
        }
    }
}

impl Drop for InstrumentationGuard {
    fn drop(&mut self) {
        self.run();
    }
}

impl std::fmt::Debug for InstrumentationGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstrumentationGuard")
            .field("name", &self.name)
            .field("installed", &self.restore.is_some())
            .finish()
    }
}
