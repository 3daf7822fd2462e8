use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LauncherOperation {
    OpenUrl { url: String },
}

impl Operation for LauncherOperation {
    type Output = ();
}

/// Capability asking the shell to open an external browser or search
/// surface. Fire-and-forget: the original app launches an intent and never
/// looks back, so there is no completion event.
pub struct Launcher<Ev> {
    context: CapabilityContext<LauncherOperation, Ev>,
}

impl<Ev> Capability<Ev> for Launcher<Ev> {
    type Operation = LauncherOperation;
    type MappedSelf<MappedEv> = Launcher<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Launcher::new(self.context.map_event(f))
    }
}

impl<Ev> Launcher<Ev>
where
    Ev: 'static,
{
    #[must_use]
    pub fn new(context: CapabilityContext<LauncherOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn open_url(&self, url: impl Into<String>) {
        let url = url.into();
        let context = self.context.clone();
        self.context.spawn(async move {
            context
                .notify_shell(LauncherOperation::OpenUrl { url })
                .await;
        });
    }
}
