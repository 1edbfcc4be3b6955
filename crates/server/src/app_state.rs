use snapshot::SnapshotLoader;

use crate::config::Settings;

pub(crate) struct AppState {
    pub(crate) settings: Settings,
    pub(crate) loader: SnapshotLoader,
}
