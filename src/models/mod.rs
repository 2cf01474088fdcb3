mod dossier;
mod dossier_detail;
mod fact;
mod story;

pub use dossier::*;
pub use dossier_detail::DossierDetail;
pub use fact::Fact;
pub use story::Story;
