// src/noyau/fonctions.rs
//
// Registre des fonctions
// ----------------------
// - nom unique ; ré-enregistrer un nom existant = no-op (avertissement dans le journal)
// - arité fixe ou variadique ; le nombre réel d'arguments vient du parseur (jeton RPN)
// - catégorie + description pour l'aide
// - rôle d'angle : l'évaluateur convertit entrée/sortie selon le mode d'angle
//
// Les implémentations sont pures : (&[Valeur]) -> Resultat<Valeur>.

use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::bibliotheque;
use super::erreurs::{ErreurCalcul, Resultat};
use super::nombres::Valeur;

pub type FnFonction = Arc<dyn Fn(&[Valeur]) -> Resultat<Valeur> + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arite {
    Fixe(usize),
    Variadique,
}

impl Arite {
    pub fn accepte(&self, n: usize) -> bool {
        match self {
            Arite::Fixe(k) => *k == n,
            Arite::Variadique => true,
        }
    }
}

impl fmt::Display for Arite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arite::Fixe(k) => write!(f, "{k}"),
            Arite::Variadique => write!(f, "n"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Categorie {
    Trigo,
    TrigoInverse,
    Hyperbolique,
    Exponentielle,
    Arrondi,
    Speciale,
    Arithmetique,
    Statistique,
    Complexe,
    Utilisateur,
}

impl Categorie {
    pub const TOUTES: [Categorie; 10] = [
        Categorie::Trigo,
        Categorie::TrigoInverse,
        Categorie::Hyperbolique,
        Categorie::Exponentielle,
        Categorie::Arrondi,
        Categorie::Speciale,
        Categorie::Arithmetique,
        Categorie::Statistique,
        Categorie::Complexe,
        Categorie::Utilisateur,
    ];

    pub fn nom(&self) -> &'static str {
        match self {
            Categorie::Trigo => "trigo",
            Categorie::TrigoInverse => "trigo_inverse",
            Categorie::Hyperbolique => "hyperbolique",
            Categorie::Exponentielle => "exponentielle",
            Categorie::Arrondi => "arrondi",
            Categorie::Speciale => "speciale",
            Categorie::Arithmetique => "arithmetique",
            Categorie::Statistique => "statistique",
            Categorie::Complexe => "complexe",
            Categorie::Utilisateur => "utilisateur",
        }
    }
}

impl fmt::Display for Categorie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.nom())
    }
}

impl FromStr for Categorie {
    type Err = ErreurCalcul;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Categorie::TOUTES
            .into_iter()
            .find(|c| c.nom() == s.trim())
            .ok_or_else(|| ErreurCalcul::IdentifiantInconnu(format!("catégorie {s}")))
    }
}

/// Conversion d'angle appliquée par l'évaluateur.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleAngle {
    Aucun,
    /// arguments réels exprimés dans l'unité courante -> radians
    Entree,
    /// résultat réel en radians -> unité courante
    Sortie,
}

#[derive(Clone)]
pub struct DescripteurFonction {
    pub nom: String,
    pub arite: Arite,
    pub appliquer: FnFonction,
    pub description: String,
    pub categorie: Categorie,
    pub angle: RoleAngle,
}

impl fmt::Debug for DescripteurFonction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescripteurFonction")
            .field("nom", &self.nom)
            .field("arite", &self.arite)
            .field("categorie", &self.categorie)
            .field("angle", &self.angle)
            .finish_non_exhaustive()
    }
}

impl DescripteurFonction {
    pub fn new<F>(nom: &str, arite: Arite, categorie: Categorie, description: &str, f: F) -> Self
    where
        F: Fn(&[Valeur]) -> Resultat<Valeur> + Send + Sync + 'static,
    {
        Self {
            nom: nom.to_string(),
            arite,
            appliquer: Arc::new(f),
            description: description.to_string(),
            categorie,
            angle: RoleAngle::Aucun,
        }
    }

    pub fn avec_angle(mut self, angle: RoleAngle) -> Self {
        self.angle = angle;
        self
    }

    /// Signature lisible : `atan2(a, b)`, `sum(x, ...)`.
    pub fn signature(&self) -> String {
        const NOMS: [&str; 4] = ["x", "y", "z", "w"];
        let args = match self.arite {
            Arite::Fixe(1) => "x".to_string(),
            Arite::Fixe(k) if k <= NOMS.len() => NOMS[..k].join(", "),
            Arite::Fixe(k) => (1..=k).map(|i| format!("x{i}")).collect::<Vec<_>>().join(", "),
            Arite::Variadique => "x, ...".to_string(),
        };
        format!("{}({})", self.nom, args)
    }

    /// Ligne d'aide : signature, catégorie, description.
    pub fn documentation(&self) -> String {
        format!("{} [{}] {}", self.signature(), self.categorie, self.description)
    }
}

#[derive(Clone, Debug, Default)]
pub struct RegistreFonctions {
    fonctions: HashMap<String, DescripteurFonction>,
    ordre: Vec<String>,
}

impl RegistreFonctions {
    /// Registre vide.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registre garni des fonctions mathématiques standard.
    pub fn standard() -> Self {
        let mut r = Self::new();
        bibliotheque::enregistrer_tout(&mut r);
        debug!("registre standard : {} fonctions", r.ordre.len());
        r
    }

    /// Idempotent : si le nom existe déjà, la première implémentation reste active.
    pub fn enregistrer(&mut self, d: DescripteurFonction) -> bool {
        if self.fonctions.contains_key(&d.nom) {
            warn!("fonction '{}' déjà enregistrée : ignorée", d.nom);
            return false;
        }
        self.ordre.push(d.nom.clone());
        self.fonctions.insert(d.nom.clone(), d);
        true
    }

    /// Point d'extension utilisateur (catégorie `utilisateur`).
    pub fn register_function<F>(&mut self, nom: &str, arite: Arite, f: F, description: &str) -> bool
    where
        F: Fn(&[Valeur]) -> Resultat<Valeur> + Send + Sync + 'static,
    {
        self.enregistrer(DescripteurFonction::new(
            nom,
            arite,
            Categorie::Utilisateur,
            description,
            f,
        ))
    }

    pub fn has_function(&self, nom: &str) -> bool {
        self.fonctions.contains_key(nom)
    }

    pub fn get_function(&self, nom: &str) -> Option<&DescripteurFonction> {
        self.fonctions.get(nom)
    }

    /// Toutes les fonctions, dans l'ordre d'enregistrement.
    pub fn toutes(&self) -> Vec<&DescripteurFonction> {
        self.ordre.iter().filter_map(|n| self.fonctions.get(n)).collect()
    }

    pub fn par_categorie(&self, categorie: Categorie) -> Vec<&DescripteurFonction> {
        self.toutes()
            .into_iter()
            .filter(|d| d.categorie == categorie)
            .collect()
    }

    /// Catégories non vides, triées.
    pub fn categories(&self) -> Vec<Categorie> {
        let mut c: Vec<_> = self.fonctions.values().map(|d| d.categorie).collect();
        c.sort();
        c.dedup();
        c
    }

    pub fn documentation(&self, nom: &str) -> Option<String> {
        self.get_function(nom).map(|d| d.documentation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn enregistrement_idempotent() {
        let mut r = RegistreFonctions::new();
        assert!(r.register_function("double", Arite::Fixe(1), |a| {
            super::super::nombres::multiplier(&a[0], &Valeur::Reel(2.0))
        }, "x * 2"));
        // deuxième implémentation ignorée
        assert!(!r.register_function("double", Arite::Fixe(1), |_| Ok(Valeur::Reel(0.0)), "zéro"));

        let d = r.get_function("double").unwrap();
        assert_eq!((d.appliquer)(&[Valeur::Reel(4.0)]).unwrap(), Valeur::Reel(8.0));
        assert_eq!(d.description, "x * 2");
        assert_eq!(r.toutes().len(), 1);
    }

    #[test]
    fn standard_et_categories() {
        let r = RegistreFonctions::standard();
        assert!(r.has_function("sin"));
        assert!(r.has_function("sum"));
        assert!(!r.has_function("pi"));

        assert_eq!(r.get_function("sum").unwrap().arite, Arite::Variadique);
        assert_eq!(r.get_function("sin").unwrap().angle, RoleAngle::Entree);
        assert_eq!(r.get_function("asin").unwrap().angle, RoleAngle::Sortie);

        let trig: Vec<_> = r.par_categorie(Categorie::Trigo).iter().map(|d| d.nom.clone()).collect();
        assert_eq!(trig, vec!["sin", "cos", "tan", "sec", "csc", "cot"]);
        assert!(!r.categories().contains(&Categorie::Utilisateur));
    }

    #[test]
    fn documentation_lisible() {
        let r = RegistreFonctions::standard();
        let doc = r.documentation("atan2").unwrap();
        assert!(doc.starts_with("atan2(x, y) [trigo_inverse]"), "{doc}");
        assert!(r.documentation("max").unwrap().starts_with("max(x, ...)"));
        assert!(r.documentation("inconnue").is_none());
    }

    #[test]
    fn categories_depuis_texte() {
        assert_eq!("statistique".parse::<Categorie>().unwrap(), Categorie::Statistique);
        assert!("zoologie".parse::<Categorie>().is_err());
    }
}
