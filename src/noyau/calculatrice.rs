// src/noyau/calculatrice.rs
//
// Façade : jetons -> RPN -> évaluation
// ------------------------------------
// - possède les modes, la table des opérateurs, le registre des fonctions,
//   les variables et l'historique
// - `calculate` ne panique jamais : toute erreur finit dans ResultatCalcul
// - un échec ne modifie ni les variables ni l'historique
// - après chaque succès, `ans` reçoit le résultat

use log::{debug, warn};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::time::{Duration, Instant, SystemTime};

use super::erreurs::{ErreurCalcul, Resultat};
use super::eval::{self, Contexte, Evaluation};
use super::fonctions::{Arite, Categorie, DescripteurFonction, RegistreFonctions};
use super::format::formater;
use super::jetons::{self, format_jetons};
use super::modes::Modes;
use super::nombres::Valeur;
use super::operateurs::{self, Associativite, Constante, DescripteurOperateur, TableOperateurs};
use super::rpn::{self, format_rpn};

pub const CAPACITE_HISTORIQUE: usize = 100;

/// Variable liée automatiquement au dernier résultat.
pub const VARIABLE_RESULTAT: &str = "ans";

/// Démarche : jetons et RPN de la dernière expression (texte).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DemarcheNoyau {
    pub jetons: String,
    pub rpn: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultatCalcul {
    pub succes: bool,
    pub valeur: Option<Valeur>,
    pub formate: Option<String>,
    pub erreur: Option<ErreurCalcul>,
    /// jetons hors Fin
    pub nb_jetons: usize,
    pub longueur_rpn: usize,
    pub operations: usize,
    pub duree: Duration,
    pub demarche: DemarcheNoyau,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Etape {
    Tokenisation,
    Analyse,
    Complete,
    Erreur,
}

impl fmt::Display for Etape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Etape::Tokenisation => "tokenization",
            Etape::Analyse => "parsing",
            Etape::Complete => "complete",
            Etape::Erreur => "error",
        };
        write!(f, "{s}")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Validation {
    pub valide: bool,
    pub erreurs: Vec<ErreurCalcul>,
    pub etape: Etape,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EntreeHistorique {
    pub expression: String,
    pub valeur: Valeur,
    pub formate: String,
    pub modes: Modes,
    pub horodatage: SystemTime,
}

pub struct Calculatrice {
    modes: Modes,
    table: TableOperateurs,
    registre: RegistreFonctions,
    variables: BTreeMap<String, Valeur>,
    historique: VecDeque<EntreeHistorique>,
    capacite: usize,
}

impl Default for Calculatrice {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculatrice {
    pub fn new() -> Self {
        Self::avec_capacite(CAPACITE_HISTORIQUE)
    }

    /// Historique borné à `capacite` entrées (les plus anciennes sortent d'abord).
    pub fn avec_capacite(capacite: usize) -> Self {
        let mut table = TableOperateurs::new();
        for d in [
            DescripteurOperateur::binaire(
                "^",
                9,
                Associativite::Droite,
                operateurs::puissance,
                "puissance",
            ),
            DescripteurOperateur::binaire(
                "%",
                6,
                Associativite::Gauche,
                operateurs::modulo,
                "reste (signe du dividende)",
            ),
            DescripteurOperateur::binaire(
                "//",
                6,
                Associativite::Gauche,
                operateurs::division_entiere,
                "division entière par défaut",
            ),
        ] {
            table.enregistrer_operateur(d);
        }

        Self {
            modes: Modes::new(),
            table,
            registre: RegistreFonctions::standard(),
            variables: BTreeMap::new(),
            historique: VecDeque::with_capacity(capacite.min(CAPACITE_HISTORIQUE)),
            capacite,
        }
    }

    fn contexte(&self) -> Contexte<'_> {
        Contexte {
            modes: &self.modes,
            table: &self.table,
            registre: &self.registre,
            variables: &self.variables,
        }
    }

    /* ------------------------ Calcul ------------------------ */

    /// Pipeline complet ; jamais d'erreur non rattrapée.
    pub fn calculate(&mut self, expression: &str) -> ResultatCalcul {
        let debut = Instant::now();
        let mut r = ResultatCalcul::default();

        match self.executer(expression, &mut r) {
            Ok(Evaluation {
                valeur, operations, ..
            }) => {
                let formate = formater(&valeur);
                debug!("{expression} = {formate}");

                self.variables
                    .insert(VARIABLE_RESULTAT.to_string(), valeur.clone());
                self.ajouter_historique(EntreeHistorique {
                    expression: expression.trim().to_string(),
                    valeur: valeur.clone(),
                    formate: formate.clone(),
                    modes: self.modes.clone(),
                    horodatage: SystemTime::now(),
                });

                r.succes = true;
                r.operations = operations;
                r.valeur = Some(valeur);
                r.formate = Some(formate);
            }
            Err(e) => {
                debug!("{expression} : échec ({e})");
                r.erreur = Some(e);
            }
        }

        r.duree = debut.elapsed();
        r
    }

    fn executer(&self, expression: &str, r: &mut ResultatCalcul) -> Resultat<Evaluation> {
        let jetons = jetons::tokenize(expression, &self.table, &self.registre)?;
        r.nb_jetons = jetons.len().saturating_sub(1);
        r.demarche.jetons = format_jetons(&jetons);

        let rpn = rpn::to_rpn(&jetons, &self.table)?;
        r.longueur_rpn = rpn.len();
        r.demarche.rpn = format_rpn(&rpn);

        eval::evaluer(&rpn, &self.contexte())
    }

    /// Validation sans évaluation : lexique d'abord, structure ensuite.
    pub fn validate_expression(&self, expression: &str) -> Validation {
        let erreurs = jetons::validate(expression, &self.table, &self.registre);
        if !erreurs.is_empty() {
            return Validation {
                valide: false,
                erreurs,
                etape: Etape::Tokenisation,
            };
        }

        let jetons = match jetons::tokenize(expression, &self.table, &self.registre) {
            Ok(j) => j,
            Err(e) => {
                return Validation {
                    valide: false,
                    erreurs: vec![e],
                    etape: Etape::Erreur,
                }
            }
        };

        let erreurs = rpn::validate(&jetons, &self.table);
        if !erreurs.is_empty() {
            return Validation {
                valide: false,
                erreurs,
                etape: Etape::Analyse,
            };
        }

        Validation {
            valide: true,
            erreurs: Vec::new(),
            etape: Etape::Complete,
        }
    }

    /* ------------------------ Variables ------------------------ */

    /// Nom de variable : identifiant ASCII, ni fonction ni constante.
    pub fn verifier_nom(&self, nom: &str) -> Resultat<()> {
        let mut chars = nom.chars();
        let syntaxe_ok = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !syntaxe_ok {
            return Err(ErreurCalcul::lexicale(
                0,
                format!("nom de variable invalide: '{nom}'"),
            ));
        }

        let w = nom.to_lowercase();
        if self.registre.has_function(&w) || self.table.is_constant(&w) {
            return Err(ErreurCalcul::lexicale(
                0,
                format!("'{nom}' est un nom réservé (fonction ou constante)"),
            ));
        }
        Ok(())
    }

    pub fn set_variable(&mut self, nom: &str, valeur: Valeur) -> Resultat<()> {
        self.verifier_nom(nom)?;
        debug!("{nom} := {valeur}");
        self.variables.insert(nom.to_string(), valeur);
        Ok(())
    }

    pub fn get_variable(&self, nom: &str) -> Option<&Valeur> {
        self.variables.get(nom)
    }

    pub fn variables(&self) -> &BTreeMap<String, Valeur> {
        &self.variables
    }

    pub fn clear_variables(&mut self) {
        self.variables.clear();
    }

    /* ------------------------ Extensions ------------------------ */

    /// Enregistre une fonction utilisateur (nom en minuscules) ; no-op si le nom existe.
    pub fn register_function<F>(&mut self, nom: &str, arite: Arite, f: F, description: &str) -> bool
    where
        F: Fn(&[Valeur]) -> Resultat<Valeur> + Send + Sync + 'static,
    {
        let nom = nom.to_lowercase();
        if self.table.is_constant(&nom) {
            warn!("'{nom}' est une constante : fonction ignorée");
            return false;
        }
        self.registre.register_function(&nom, arite, f, description)
    }

    pub fn get_operators(&self) -> Vec<&DescripteurOperateur> {
        self.table.all_operators()
    }

    pub fn get_constants(&self) -> Vec<&Constante> {
        self.table.all_constants()
    }

    pub fn get_functions(&self) -> Vec<&DescripteurFonction> {
        self.registre.toutes()
    }

    pub fn get_functions_by_category(&self, categorie: Categorie) -> Vec<&DescripteurFonction> {
        self.registre.par_categorie(categorie)
    }

    pub fn categories(&self) -> Vec<Categorie> {
        self.registre.categories()
    }

    /* ------------------------ Modes ------------------------ */

    pub fn modes(&self) -> &Modes {
        &self.modes
    }

    pub fn set_angle_mode(&mut self, s: &str) -> Resultat<()> {
        journaliser_refus(self.modes.set_angle_mode(s))
    }

    pub fn set_precision_mode(&mut self, s: &str) -> Resultat<()> {
        journaliser_refus(self.modes.set_precision_mode(s))
    }

    pub fn set_complex_mode(&mut self, s: &str) -> Resultat<()> {
        journaliser_refus(self.modes.set_complex_mode(s))
    }

    pub fn set_precision(&mut self, digits: u32) -> Resultat<()> {
        journaliser_refus(self.modes.set_precision(digits))
    }

    pub fn set_rounding_mode(&mut self, s: &str) -> Resultat<()> {
        journaliser_refus(self.modes.set_rounding_mode(s))
    }

    pub fn reset_modes(&mut self) {
        self.modes.reset();
    }

    /* ------------------------ Historique ------------------------ */

    fn ajouter_historique(&mut self, entree: EntreeHistorique) {
        if self.capacite == 0 {
            return;
        }
        while self.historique.len() >= self.capacite {
            self.historique.pop_front();
        }
        self.historique.push_back(entree);
    }

    /// Du plus ancien au plus récent.
    pub fn history(&self) -> &VecDeque<EntreeHistorique> {
        &self.historique
    }

    pub fn clear_history(&mut self) {
        self.historique.clear();
    }
}

fn journaliser_refus(r: Resultat<()>) -> Resultat<()> {
    if let Err(e) = &r {
        warn!("{e}");
    }
    r
}
