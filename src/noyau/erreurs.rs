// src/noyau/erreurs.rs
//
// Erreurs du noyau
// ----------------
// Une seule énumération pour tout le pipeline (jetons -> RPN -> évaluation).
// - chemin rapide : Result<_, ErreurCalcul> + `?` (première erreur = arrêt)
// - chemin validation : Vec<ErreurCalcul> (toutes les erreurs détectables)
//
// Les messages restent en français : ils remontent tels quels jusqu'à l'utilisateur.

use thiserror::Error;

/// Résultat du noyau.
pub type Resultat<T> = Result<T, ErreurCalcul>;

/// Erreurs numériques (garde IEEE-754 + opérations invalides).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErreurNumerique {
    #[error("dépassement de capacité")]
    Depassement,

    #[error("sous-dépassement de capacité")]
    SousDepassement,

    #[error("opération invalide: {0}")]
    OperationInvalide(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErreurCalcul {
    /// Caractère inattendu, littéral numérique mal formé.
    #[error("erreur lexicale à la position {position}: {message}")]
    Lexicale { position: usize, message: String },

    /// Parenthèses, virgules, opérateurs consécutifs, expression vide...
    #[error("erreur de structure à la position {position}: {message}")]
    Structure { position: usize, message: String },

    #[error("identifiant inconnu: '{0}'")]
    IdentifiantInconnu(String),

    #[error("'{nom}' attend {attendu} argument(s), reçu {recu}")]
    Arite {
        nom: String,
        attendu: String,
        recu: usize,
    },

    #[error("division par zéro ({0})")]
    DivisionParZero(String),

    #[error("erreur numérique: {0}")]
    Numerique(#[from] ErreurNumerique),

    #[error("configuration de mode invalide: {0}")]
    Mode(String),
}

impl ErreurCalcul {
    pub fn lexicale(position: usize, message: impl Into<String>) -> Self {
        ErreurCalcul::Lexicale {
            position,
            message: message.into(),
        }
    }

    pub fn structure(position: usize, message: impl Into<String>) -> Self {
        ErreurCalcul::Structure {
            position,
            message: message.into(),
        }
    }

    pub fn invalide(message: impl Into<String>) -> Self {
        ErreurCalcul::Numerique(ErreurNumerique::OperationInvalide(message.into()))
    }

    pub fn arite(nom: &str, attendu: impl ToString, recu: usize) -> Self {
        ErreurCalcul::Arite {
            nom: nom.to_string(),
            attendu: attendu.to_string(),
            recu,
        }
    }

    /// Étape de validation associée (pour `validate_expression`).
    pub fn est_structurelle(&self) -> bool {
        matches!(
            self,
            ErreurCalcul::Lexicale { .. } | ErreurCalcul::Structure { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_lisibles() {
        let e = ErreurCalcul::lexicale(3, "caractère inattendu: '$'");
        assert_eq!(
            e.to_string(),
            "erreur lexicale à la position 3: caractère inattendu: '$'"
        );

        let e: ErreurCalcul = ErreurNumerique::Depassement.into();
        assert_eq!(e.to_string(), "erreur numérique: dépassement de capacité");

        let e = ErreurCalcul::arite("atan2", 2, 1);
        assert!(e.to_string().contains("atan2"));
        assert!(!e.est_structurelle());
    }
}
