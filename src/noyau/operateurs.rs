// src/noyau/operateurs.rs
//
// Table des opérateurs + constantes
// ---------------------------------
// - clé = symbole exact ; binaires et unaires (préfixes) dans deux tables séparées
// - précédence : plus grand = lie plus fort
// - ajout uniquement (construction + points d'extension) ; ré-enregistrer = no-op
//
// Précédences de base :
//   ||:1  &&:2  == !=:3  < <= > >=:4  + -:5  * /:6  unaires:8  **:9 (droite)
// Ajoutés par la calculatrice : ^:9 (droite), % et //:6 (gauche)

use log::warn;
use std::collections::HashMap;
use std::f64::consts::{E, PI, TAU};

use super::complexe::I;
use super::decimal::Decimal;
use super::erreurs::Resultat;
use super::nombres::{self, Valeur};

/// Implémentation d'un opérateur : reçoit exactement `arite` opérandes.
pub type FnOperateur = fn(&[Valeur]) -> Resultat<Valeur>;

/// Valeur exacte d'une constante en régime décimal.
pub type FnConstanteExacte = fn(u32) -> Resultat<Decimal>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Associativite {
    Gauche,
    Droite,
}

#[derive(Clone, Debug)]
pub struct DescripteurOperateur {
    pub symbole: String,
    pub arite: u8,
    pub precedence: u8,
    pub associativite: Associativite,
    pub appliquer: FnOperateur,
    pub description: String,
}

impl DescripteurOperateur {
    pub fn binaire(
        symbole: &str,
        precedence: u8,
        associativite: Associativite,
        appliquer: FnOperateur,
        description: &str,
    ) -> Self {
        Self {
            symbole: symbole.to_string(),
            arite: 2,
            precedence,
            associativite,
            appliquer,
            description: description.to_string(),
        }
    }

    pub fn unaire(symbole: &str, precedence: u8, appliquer: FnOperateur, description: &str) -> Self {
        Self {
            symbole: symbole.to_string(),
            arite: 1,
            precedence,
            associativite: Associativite::Droite,
            appliquer,
            description: description.to_string(),
        }
    }

    pub fn est_gauche(&self) -> bool {
        self.associativite == Associativite::Gauche
    }
}

#[derive(Clone, Debug)]
pub struct Constante {
    pub nom: String,
    pub valeur: Valeur,
    pub exacte: Option<FnConstanteExacte>,
    pub description: String,
}

#[derive(Clone, Debug, Default)]
pub struct TableOperateurs {
    binaires: HashMap<String, DescripteurOperateur>,
    unaires: HashMap<String, DescripteurOperateur>,
    // ordre d'enregistrement (listes stables pour l'aide)
    ordre: Vec<(bool, String)>,

    constantes: HashMap<String, Constante>,
    ordre_constantes: Vec<String>,
}

impl TableOperateurs {
    /// Table de base (sans ^, %, // : ajoutés par la calculatrice).
    pub fn new() -> Self {
        use Associativite::*;

        let mut t = Self::default();

        for d in [
            DescripteurOperateur::binaire("||", 1, Gauche, ou, "ou logique (non nul = vrai)"),
            DescripteurOperateur::binaire("&&", 2, Gauche, et, "et logique"),
            DescripteurOperateur::binaire("==", 3, Gauche, egal, "égalité"),
            DescripteurOperateur::binaire("!=", 3, Gauche, different, "différence"),
            DescripteurOperateur::binaire("<", 4, Gauche, inferieur, "strictement inférieur"),
            DescripteurOperateur::binaire("<=", 4, Gauche, inferieur_egal, "inférieur ou égal"),
            DescripteurOperateur::binaire(">", 4, Gauche, superieur, "strictement supérieur"),
            DescripteurOperateur::binaire(">=", 4, Gauche, superieur_egal, "supérieur ou égal"),
            DescripteurOperateur::binaire("+", 5, Gauche, plus, "addition"),
            DescripteurOperateur::binaire("-", 5, Gauche, moins, "soustraction"),
            DescripteurOperateur::binaire("*", 6, Gauche, fois, "multiplication"),
            DescripteurOperateur::binaire("/", 6, Gauche, divise, "division"),
            DescripteurOperateur::binaire("**", 9, Droite, puissance, "puissance"),
            DescripteurOperateur::unaire("-", 8, oppose, "opposé"),
            DescripteurOperateur::unaire("+", 8, identite, "plus unaire"),
            DescripteurOperateur::unaire("!", 8, non, "non logique"),
        ] {
            t.enregistrer_operateur(d);
        }

        t.enregistrer_constante("pi", Valeur::Reel(PI), Some(pi_exact), "π");
        t.enregistrer_constante("e", Valeur::Reel(E), Some(e_exact), "base du logarithme népérien");
        t.enregistrer_constante("tau", Valeur::Reel(TAU), Some(tau_exact), "2π");
        t.enregistrer_constante(
            "phi",
            Valeur::Reel(1.618_033_988_749_895),
            Some(phi_exact),
            "nombre d'or",
        );
        t.enregistrer_constante("i", Valeur::Complexe(I), None, "unité imaginaire");

        t
    }

    /* ------------------------ Enregistrement ------------------------ */

    /// Ajoute un opérateur ; un symbole déjà présent (même arité) est ignoré.
    pub fn enregistrer_operateur(&mut self, d: DescripteurOperateur) -> bool {
        let unaire = d.arite == 1;
        let table = if unaire {
            &mut self.unaires
        } else {
            &mut self.binaires
        };
        if table.contains_key(&d.symbole) {
            warn!("opérateur '{}' déjà enregistré : ignoré", d.symbole);
            return false;
        }
        self.ordre.push((unaire, d.symbole.clone()));
        table.insert(d.symbole.clone(), d);
        true
    }

    pub fn enregistrer_constante(
        &mut self,
        nom: &str,
        valeur: Valeur,
        exacte: Option<FnConstanteExacte>,
        description: &str,
    ) -> bool {
        if self.constantes.contains_key(nom) {
            warn!("constante '{nom}' déjà enregistrée : ignorée");
            return false;
        }
        self.ordre_constantes.push(nom.to_string());
        self.constantes.insert(
            nom.to_string(),
            Constante {
                nom: nom.to_string(),
                valeur,
                exacte,
                description: description.to_string(),
            },
        );
        true
    }

    /* ------------------------ Recherche ------------------------ */

    pub fn is_operator(&self, symbole: &str) -> bool {
        self.binaires.contains_key(symbole) || self.unaires.contains_key(symbole)
    }

    /// Opérateur binaire.
    pub fn get_operator(&self, symbole: &str) -> Option<&DescripteurOperateur> {
        self.binaires.get(symbole)
    }

    /// Opérateur unaire préfixe.
    pub fn get_unary(&self, symbole: &str) -> Option<&DescripteurOperateur> {
        self.unaires.get(symbole)
    }

    pub fn is_constant(&self, nom: &str) -> bool {
        self.constantes.contains_key(nom)
    }

    pub fn get_constant(&self, nom: &str) -> Option<&Constante> {
        self.constantes.get(nom)
    }

    /// Plus long symbole enregistré qui préfixe `reste` (multi-caractères d'abord).
    pub fn plus_long_symbole(&self, reste: &str) -> Option<&str> {
        self.binaires
            .keys()
            .chain(self.unaires.keys())
            .filter(|s| reste.starts_with(s.as_str()))
            .max_by_key(|s| s.len())
            .map(|s| s.as_str())
    }

    pub fn all_operators(&self) -> Vec<&DescripteurOperateur> {
        self.ordre
            .iter()
            .filter_map(|(unaire, s)| {
                if *unaire {
                    self.unaires.get(s)
                } else {
                    self.binaires.get(s)
                }
            })
            .collect()
    }

    pub fn all_constants(&self) -> Vec<&Constante> {
        self.ordre_constantes
            .iter()
            .filter_map(|n| self.constantes.get(n))
            .collect()
    }
}

/* ------------------------ Implémentations ------------------------ */

fn plus(a: &[Valeur]) -> Resultat<Valeur> {
    nombres::ajouter(&a[0], &a[1])
}

fn moins(a: &[Valeur]) -> Resultat<Valeur> {
    nombres::soustraire(&a[0], &a[1])
}

fn fois(a: &[Valeur]) -> Resultat<Valeur> {
    nombres::multiplier(&a[0], &a[1])
}

fn divise(a: &[Valeur]) -> Resultat<Valeur> {
    nombres::diviser(&a[0], &a[1])
}

pub fn puissance(a: &[Valeur]) -> Resultat<Valeur> {
    nombres::puissance(&a[0], &a[1])
}

pub fn modulo(a: &[Valeur]) -> Resultat<Valeur> {
    nombres::reste(&a[0], &a[1])
}

pub fn division_entiere(a: &[Valeur]) -> Resultat<Valeur> {
    nombres::division_entiere(&a[0], &a[1])
}

fn egal(a: &[Valeur]) -> Resultat<Valeur> {
    Ok(Valeur::booleen(nombres::egal(&a[0], &a[1])?))
}

fn different(a: &[Valeur]) -> Resultat<Valeur> {
    Ok(Valeur::booleen(!nombres::egal(&a[0], &a[1])?))
}

fn inferieur(a: &[Valeur]) -> Resultat<Valeur> {
    Ok(Valeur::booleen(nombres::comparer(&a[0], &a[1])?.is_lt()))
}

fn inferieur_egal(a: &[Valeur]) -> Resultat<Valeur> {
    Ok(Valeur::booleen(nombres::comparer(&a[0], &a[1])?.is_le()))
}

fn superieur(a: &[Valeur]) -> Resultat<Valeur> {
    Ok(Valeur::booleen(nombres::comparer(&a[0], &a[1])?.is_gt()))
}

fn superieur_egal(a: &[Valeur]) -> Resultat<Valeur> {
    Ok(Valeur::booleen(nombres::comparer(&a[0], &a[1])?.is_ge()))
}

fn et(a: &[Valeur]) -> Resultat<Valeur> {
    Ok(Valeur::booleen(!a[0].est_zero() && !a[1].est_zero()))
}

fn ou(a: &[Valeur]) -> Resultat<Valeur> {
    Ok(Valeur::booleen(!a[0].est_zero() || !a[1].est_zero()))
}

fn oppose(a: &[Valeur]) -> Resultat<Valeur> {
    Ok(nombres::negation(&a[0]))
}

fn identite(a: &[Valeur]) -> Resultat<Valeur> {
    Ok(a[0].clone())
}

fn non(a: &[Valeur]) -> Resultat<Valeur> {
    Ok(Valeur::booleen(a[0].est_zero()))
}

/* ------------------------ Constantes exactes ------------------------ */

fn pi_exact(p: u32) -> Resultat<Decimal> {
    Ok(Decimal::pi(p))
}

fn e_exact(p: u32) -> Resultat<Decimal> {
    Ok(Decimal::e(p))
}

fn tau_exact(p: u32) -> Resultat<Decimal> {
    Ok(Decimal::pi(p).mul(&Decimal::depuis_entier(&2.into(), p)))
}

/// φ = (1 + √5) / 2
fn phi_exact(p: u32) -> Resultat<Decimal> {
    let un = Decimal::depuis_entier(&1.into(), p);
    let deux = Decimal::depuis_entier(&2.into(), p);
    let cinq = Decimal::depuis_entier(&5.into(), p);
    un.add(&cinq.racine()?).div(&deux)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::modes::Arrondi;
    use pretty_assertions::assert_eq;

    #[test]
    fn recherche_exacte() {
        let t = TableOperateurs::new();
        assert!(t.is_operator("**"));
        assert!(t.is_operator("!"));
        assert!(!t.is_operator("^"), "^ est ajouté par la calculatrice");
        assert_eq!(t.get_operator("**").unwrap().associativite, Associativite::Droite);
        assert_eq!(t.get_operator("*").unwrap().precedence, 6);
        assert_eq!(t.get_unary("-").unwrap().arite, 1);
        assert!(t.get_operator("!").is_none());
    }

    #[test]
    fn symboles_multi_caracteres_prioritaires() {
        let t = TableOperateurs::new();
        assert_eq!(t.plus_long_symbole("**2"), Some("**"));
        assert_eq!(t.plus_long_symbole("<=3"), Some("<="));
        assert_eq!(t.plus_long_symbole("<3"), Some("<"));
        assert_eq!(t.plus_long_symbole("!=1"), Some("!="));
        assert_eq!(t.plus_long_symbole("$"), None);
    }

    #[test]
    fn enregistrement_idempotent() {
        let mut t = TableOperateurs::new();
        let n = t.all_operators().len();
        let autre = DescripteurOperateur::binaire("+", 1, Associativite::Droite, moins, "x");
        assert!(!t.enregistrer_operateur(autre));
        assert_eq!(t.get_operator("+").unwrap().precedence, 5);
        assert_eq!(t.all_operators().len(), n);

        let pct = DescripteurOperateur::binaire("%", 6, Associativite::Gauche, modulo, "reste");
        assert!(t.enregistrer_operateur(pct));
        assert_eq!(t.all_operators().last().unwrap().symbole, "%");
    }

    #[test]
    fn constantes() {
        let t = TableOperateurs::new();
        let noms: Vec<_> = t.all_constants().iter().map(|c| c.nom.as_str()).collect();
        assert_eq!(noms, vec!["pi", "e", "tau", "phi", "i"]);
        assert!(t.is_constant("pi"));
        assert!(!t.is_constant("x"));

        let phi = (t.get_constant("phi").unwrap().exacte.unwrap())(20).unwrap();
        assert_eq!(
            phi.arrondir(15, Arrondi::VersZero).to_string(),
            "1.618033988749894"
        );
    }

    #[test]
    fn operateurs_logiques() {
        let t = TableOperateurs::new();
        let et = t.get_operator("&&").unwrap().appliquer;
        assert_eq!(et(&[Valeur::Reel(2.0), Valeur::Reel(0.0)]).unwrap(), Valeur::Reel(0.0));
        let non = t.get_unary("!").unwrap().appliquer;
        assert_eq!(non(&[Valeur::Reel(0.0)]).unwrap(), Valeur::Reel(1.0));
    }
}
