// src/lib.rs
//
// Calculatrice scientifique : bibliothèque (noyau sans E/S)

pub mod noyau;

pub use noyau::{
    Angle, Arite, Arrondi, Calculatrice, Categorie, EntreeHistorique, ErreurCalcul,
    ErreurNumerique, Etape, Modes, PolitiqueComplexe, Regime, Resultat, ResultatCalcul,
    Validation, Valeur, CAPACITE_HISTORIQUE,
};
