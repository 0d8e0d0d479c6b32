//! src/app/etat.rs
//!
//! État de session (sans affichage, sans E/S).
//!
//! Rôle : posséder la calculatrice, lire une ligne (commande `:` ou expression)
//! et produire une `Reponse` que vue.rs met en forme.
//!
//! Contrats :
//! - Aucune écriture terminal ici.
//! - Une ligne invalide donne une Reponse::Erreur, jamais un arrêt.

use std::str::FromStr;

use thiserror::Error;

use calculatrice_sci::noyau::calculatrice::{EntreeHistorique, ResultatCalcul, Validation};
use calculatrice_sci::{Calculatrice, Categorie, Modes, Resultat, Valeur};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErreurCommande {
    #[error("commande inconnue: ':{0}' (':help' pour la liste)")]
    Inconnue(String),

    #[error("':{0}' attend un argument")]
    ArgumentManquant(&'static str),

    #[error("argument invalide pour ':{commande}': '{valeur}'")]
    ArgumentInvalide { commande: &'static str, valeur: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Commande {
    Vide,
    Calcul(String),
    Angle(String),
    Regime(String),
    Complexe(String),
    Precision(u32),
    Arrondi(String),
    Definir { nom: String, expression: String },
    Variables,
    Historique,
    Fonctions(Option<Categorie>),
    Verifier(String),
    Modes,
    Reinitialiser,
    Aide,
    Quitter,
}

impl FromStr for Commande {
    type Err = ErreurCommande;

    fn from_str(ligne: &str) -> Result<Self, Self::Err> {
        let ligne = ligne.trim();
        let Some(reste) = ligne.strip_prefix(':') else {
            return Ok(if ligne.is_empty() {
                Commande::Vide
            } else {
                Commande::Calcul(ligne.to_string())
            });
        };

        let (nom, arg) = match reste.split_once(char::is_whitespace) {
            Some((n, a)) => (n, a.trim()),
            None => (reste, ""),
        };

        let requis = |commande: &'static str| {
            if arg.is_empty() {
                Err(ErreurCommande::ArgumentManquant(commande))
            } else {
                Ok(arg.to_string())
            }
        };

        match nom {
            "angle" => requis("angle").map(Commande::Angle),
            "regime" => requis("regime").map(Commande::Regime),
            "complex" => requis("complex").map(Commande::Complexe),
            "rounding" => requis("rounding").map(Commande::Arrondi),
            "precision" => {
                let a = requis("precision")?;
                a.parse()
                    .map(Commande::Precision)
                    .map_err(|_| ErreurCommande::ArgumentInvalide {
                        commande: "precision",
                        valeur: a,
                    })
            }
            "let" => {
                let a = requis("let")?;
                match a.split_once('=') {
                    Some((n, e)) if !n.trim().is_empty() && !e.trim().is_empty() => {
                        Ok(Commande::Definir {
                            nom: n.trim().to_string(),
                            expression: e.trim().to_string(),
                        })
                    }
                    _ => Err(ErreurCommande::ArgumentInvalide {
                        commande: "let",
                        valeur: a,
                    }),
                }
            }
            "vars" => Ok(Commande::Variables),
            "history" => Ok(Commande::Historique),
            "functions" if arg.is_empty() => Ok(Commande::Fonctions(None)),
            "functions" => arg
                .parse()
                .map(|c| Commande::Fonctions(Some(c)))
                .map_err(|_| ErreurCommande::ArgumentInvalide {
                    commande: "functions",
                    valeur: arg.to_string(),
                }),
            "check" => requis("check").map(Commande::Verifier),
            "modes" => Ok(Commande::Modes),
            "reset" => Ok(Commande::Reinitialiser),
            "help" => Ok(Commande::Aide),
            "quit" | "q" => Ok(Commande::Quitter),
            autre => Err(ErreurCommande::Inconnue(autre.to_string())),
        }
    }
}

/// Ce que la session a produit pour une ligne.
#[derive(Clone, Debug, PartialEq)]
pub enum Reponse {
    Rien,
    Calcul(ResultatCalcul),
    Definition { nom: String, resultat: ResultatCalcul },
    Validation(Validation),
    Modes(Modes),
    Variables(Vec<(String, Valeur)>),
    Historique(Vec<EntreeHistorique>),
    /// (catégorie, documentations)
    Fonctions(Vec<(Categorie, Vec<String>)>),
    Aide,
    Erreur(String),
    Quitter,
}

/// Options de départ (ligne de commande).
#[derive(Clone, Debug)]
pub struct Configuration {
    pub angle: String,
    pub regime: String,
    pub complexe: String,
    pub precision: u32,
    pub arrondi: String,
    pub historique: usize,
    pub demarche: bool,
}

pub struct Session {
    calc: Calculatrice,
    /// affiche jetons + RPN avec chaque résultat
    pub demarche: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            calc: Calculatrice::new(),
            demarche: false,
        }
    }
}

impl Session {
    pub fn depuis_configuration(cfg: &Configuration) -> Resultat<Self> {
        let mut calc = Calculatrice::avec_capacite(cfg.historique);
        calc.set_angle_mode(&cfg.angle)?;
        calc.set_precision_mode(&cfg.regime)?;
        calc.set_complex_mode(&cfg.complexe)?;
        calc.set_precision(cfg.precision)?;
        calc.set_rounding_mode(&cfg.arrondi)?;
        Ok(Self {
            calc,
            demarche: cfg.demarche,
        })
    }

    #[cfg(test)]
    pub fn calculatrice(&self) -> &Calculatrice {
        &self.calc
    }

    /// Lit puis exécute une ligne.
    pub fn traiter_ligne(&mut self, ligne: &str) -> Reponse {
        match ligne.parse::<Commande>() {
            Ok(c) => self.executer(c),
            Err(e) => Reponse::Erreur(e.to_string()),
        }
    }

    pub fn executer(&mut self, commande: Commande) -> Reponse {
        match commande {
            Commande::Vide => Reponse::Rien,
            Commande::Calcul(expr) => Reponse::Calcul(self.calc.calculate(&expr)),

            Commande::Angle(s) => self.changer_mode(|c| c.set_angle_mode(&s)),
            Commande::Regime(s) => self.changer_mode(|c| c.set_precision_mode(&s)),
            Commande::Complexe(s) => self.changer_mode(|c| c.set_complex_mode(&s)),
            Commande::Precision(n) => self.changer_mode(|c| c.set_precision(n)),
            Commande::Arrondi(s) => self.changer_mode(|c| c.set_rounding_mode(&s)),

            Commande::Definir { nom, expression } => {
                if let Err(e) = self.calc.verifier_nom(&nom) {
                    return Reponse::Erreur(e.to_string());
                }
                let resultat = self.calc.calculate(&expression);
                if let Some(v) = &resultat.valeur {
                    if let Err(e) = self.calc.set_variable(&nom, v.clone()) {
                        return Reponse::Erreur(e.to_string());
                    }
                }
                Reponse::Definition { nom, resultat }
            }

            Commande::Variables => Reponse::Variables(
                self.calc
                    .variables()
                    .iter()
                    .map(|(n, v)| (n.clone(), v.clone()))
                    .collect(),
            ),
            Commande::Historique => {
                Reponse::Historique(self.calc.history().iter().cloned().collect())
            }
            Commande::Fonctions(filtre) => {
                let categories = match filtre {
                    Some(c) => vec![c],
                    None => self.calc.categories(),
                };
                Reponse::Fonctions(
                    categories
                        .into_iter()
                        .map(|c| {
                            let docs = self
                                .calc
                                .get_functions_by_category(c)
                                .iter()
                                .map(|d| d.documentation())
                                .collect();
                            (c, docs)
                        })
                        .collect(),
                )
            }
            Commande::Verifier(expr) => Reponse::Validation(self.calc.validate_expression(&expr)),
            Commande::Modes => Reponse::Modes(self.calc.modes().clone()),
            Commande::Reinitialiser => {
                self.calc.reset_modes();
                self.calc.clear_variables();
                self.calc.clear_history();
                Reponse::Modes(self.calc.modes().clone())
            }
            Commande::Aide => Reponse::Aide,
            Commande::Quitter => Reponse::Quitter,
        }
    }

    fn changer_mode(&mut self, f: impl FnOnce(&mut Calculatrice) -> Resultat<()>) -> Reponse {
        match f(&mut self.calc) {
            Ok(()) => Reponse::Modes(self.calc.modes().clone()),
            Err(e) => Reponse::Erreur(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calculatrice_sci::Angle;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("", Commande::Vide)]
    #[case("  2 + 3 ", Commande::Calcul("2 + 3".into()))]
    #[case(":angle deg", Commande::Angle("deg".into()))]
    #[case(":regime decimal", Commande::Regime("decimal".into()))]
    #[case(":complex auto", Commande::Complexe("auto".into()))]
    #[case(":precision 30", Commande::Precision(30))]
    #[case(":rounding up", Commande::Arrondi("up".into()))]
    #[case(":let x = 2*pi", Commande::Definir { nom: "x".into(), expression: "2*pi".into() })]
    #[case(":vars", Commande::Variables)]
    #[case(":history", Commande::Historique)]
    #[case(":functions", Commande::Fonctions(None))]
    #[case(":functions statistique", Commande::Fonctions(Some(Categorie::Statistique)))]
    #[case(":check (2+3", Commande::Verifier("(2+3".into()))]
    #[case(":reset", Commande::Reinitialiser)]
    #[case(":quit", Commande::Quitter)]
    fn lecture_des_commandes(#[case] ligne: &str, #[case] attendu: Commande) {
        assert_eq!(ligne.parse::<Commande>(), Ok(attendu));
    }

    #[rstest]
    #[case(":volume 11", ErreurCommande::Inconnue("volume".into()))]
    #[case(":angle", ErreurCommande::ArgumentManquant("angle"))]
    #[case(":precision trente", ErreurCommande::ArgumentInvalide { commande: "precision", valeur: "trente".into() })]
    #[case(":let x", ErreurCommande::ArgumentInvalide { commande: "let", valeur: "x".into() })]
    #[case(":functions magie", ErreurCommande::ArgumentInvalide { commande: "functions", valeur: "magie".into() })]
    fn commandes_invalides(#[case] ligne: &str, #[case] attendu: ErreurCommande) {
        assert_eq!(ligne.parse::<Commande>(), Err(attendu));
    }

    #[test]
    fn definition_puis_usage() {
        let mut s = Session::default();
        assert!(matches!(
            s.traiter_ligne(":let x = 2*pi"),
            Reponse::Definition { ref nom, ref resultat } if nom == "x" && resultat.succes
        ));
        match s.traiter_ligne("x / pi") {
            Reponse::Calcul(r) => assert_eq!(r.formate.as_deref(), Some("2")),
            autre => panic!("réponse inattendue: {autre:?}"),
        }
        assert!(matches!(s.traiter_ligne(":let sin = 1"), Reponse::Erreur(_)));
    }

    #[test]
    fn modes_et_reinitialisation() {
        let mut s = Session::default();
        match s.traiter_ligne(":angle grad") {
            Reponse::Modes(m) => assert_eq!(m.angle(), Angle::Grad),
            autre => panic!("réponse inattendue: {autre:?}"),
        }
        assert!(matches!(s.traiter_ligne(":angle tours"), Reponse::Erreur(_)));
        s.traiter_ligne("1 + 1");
        assert_eq!(s.calculatrice().history().len(), 1);

        s.traiter_ligne(":reset");
        assert_eq!(s.calculatrice().modes(), &Modes::default());
        assert!(s.calculatrice().history().is_empty());
        assert!(s.calculatrice().get_variable("ans").is_none());
    }

    #[test]
    fn configuration_refusee() {
        let cfg = Configuration {
            angle: "deg".into(),
            regime: "decimal".into(),
            complexe: "on".into(),
            precision: 0,
            arrondi: "nearest".into(),
            historique: 10,
            demarche: false,
        };
        assert!(Session::depuis_configuration(&cfg).is_err());
        let cfg = Configuration { precision: 30, ..cfg };
        assert!(Session::depuis_configuration(&cfg).is_ok());
    }
}
