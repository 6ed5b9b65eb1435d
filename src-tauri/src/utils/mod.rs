/// Utilitaires transverses de normalisation de chemins.
pub mod path;
