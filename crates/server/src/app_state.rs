use legal_codes::LegalCodeDirectory;

use crate::vworld::VworldClient;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) directory: LegalCodeDirectory,
    pub(crate) vworld: VworldClient,
}
