// src/noyau/rpn.rs
//
// Shunting-yard -> RPN
// Objectif:
// - Convertir une suite de jetons en RPN (postfix)
// - Chaque appel de fonction sort avec son nombre d'arguments (nb_args)
//
// Règles:
// - opérandes : sortie directe
// - opérateur entrant : on dépile tant que le sommet lie strictement plus fort,
//   ou aussi fort si l'entrant est associatif à gauche (2^3^2 = 2^(3^2))
// - '(' ouvre un cadre ; ',' compte un argument dans le cadre d'appel courant
// - ')' ferme le cadre et sort la fonction éventuelle ; f() => 0 argument
//
// NOTE:
// - Les opérateurs unaires sont préfixes : ils ne dépilent jamais rien à l'entrée.

use log::trace;

use super::erreurs::{ErreurCalcul, Resultat};
use super::jetons::{Jeton, Tok};
use super::operateurs::{DescripteurOperateur, TableOperateurs};

/// Cadre de parenthèses ouvert.
struct Cadre {
    position: usize,
    appel: bool,
    virgules: usize,
}

struct Analyseur<'a> {
    table: &'a TableOperateurs,
    sortie: Vec<Jeton>,
    ops: Vec<Jeton>,
    cadres: Vec<Cadre>,
    // vrai au début, après un opérateur, '(' ou ','
    attend_operande: bool,
    erreurs: Option<Vec<ErreurCalcul>>,
}

impl<'a> Analyseur<'a> {
    fn new(table: &'a TableOperateurs, collecte: bool) -> Self {
        Self {
            table,
            sortie: Vec::new(),
            ops: Vec::new(),
            cadres: Vec::new(),
            attend_operande: true,
            erreurs: collecte.then(Vec::new),
        }
    }

    fn signaler(&mut self, e: ErreurCalcul) -> Resultat<()> {
        match &mut self.erreurs {
            Some(v) => {
                v.push(e);
                Ok(())
            }
            None => Err(e),
        }
    }

    fn descripteur(&self, j: &Jeton) -> Option<&'a DescripteurOperateur> {
        match &j.tok {
            Tok::Operateur(s) => self.table.get_operator(s),
            Tok::Unaire(s) => self.table.get_unary(s),
            _ => None,
        }
    }

    /// Dépile vers la sortie jusqu'à la '(' du cadre courant (non consommée).
    fn vider_jusqu_a_parenthese(&mut self) {
        while let Some(top) = self.ops.last() {
            if top.tok == Tok::ParG {
                break;
            }
            if let Some(j) = self.ops.pop() {
                self.sortie.push(j);
            }
        }
    }

    fn analyser(mut self, jetons: &[Jeton]) -> Result<(Vec<Jeton>, Vec<ErreurCalcul>), ErreurCalcul> {
        let mut precedent: Option<&Tok> = None;

        for (k, j) in jetons.iter().enumerate() {
            match &j.tok {
                Tok::Nombre(_) | Tok::Constante(_) | Tok::Variable(_) => {
                    if !self.attend_operande {
                        self.signaler(ErreurCalcul::structure(
                            j.position,
                            format!("opérandes consécutifs : '{}' inattendu", j.tok),
                        ))?;
                    }
                    self.sortie.push(j.clone());
                    self.attend_operande = false;
                }

                Tok::Fonction(nom) => {
                    if !self.attend_operande {
                        self.signaler(ErreurCalcul::structure(
                            j.position,
                            format!("opérandes consécutifs : '{nom}' inattendu"),
                        ))?;
                    }
                    let suivi_de_parenthese =
                        matches!(jetons.get(k + 1).map(|s| &s.tok), Some(Tok::ParG));
                    if suivi_de_parenthese {
                        self.ops.push(j.clone());
                    } else {
                        self.signaler(ErreurCalcul::structure(
                            j.position,
                            format!("fonction '{nom}' sans '('"),
                        ))?;
                        // traitée comme une valeur pour poursuivre l'analyse
                        self.attend_operande = false;
                    }
                }

                Tok::Unaire(_) => {
                    self.ops.push(j.clone());
                    self.attend_operande = true;
                }

                Tok::Operateur(s) => {
                    if self.attend_operande {
                        self.signaler(ErreurCalcul::structure(
                            j.position,
                            format!("opérateur '{s}' sans opérande gauche"),
                        ))?;
                    }
                    let Some(entrant) = self.descripteur(j) else {
                        self.signaler(ErreurCalcul::structure(
                            j.position,
                            format!("opérateur inconnu '{s}'"),
                        ))?;
                        continue;
                    };

                    // dépile tant que:
                    // - on n'est pas bloqué par '(' ou une fonction
                    // - et la précédence/associativité exige de sortir l'opérateur du haut
                    while let Some(top) = self.ops.last() {
                        let Some(d) = self.descripteur(top) else { break };
                        let doit_pop = if entrant.est_gauche() {
                            d.precedence >= entrant.precedence
                        } else {
                            d.precedence > entrant.precedence
                        };
                        if !doit_pop {
                            break;
                        }
                        if let Some(o) = self.ops.pop() {
                            self.sortie.push(o);
                        }
                    }
                    self.ops.push(j.clone());
                    self.attend_operande = true;
                }

                Tok::ParG => {
                    if !self.attend_operande {
                        self.signaler(ErreurCalcul::structure(
                            j.position,
                            "'(' après une valeur (multiplication implicite non supportée)",
                        ))?;
                    }
                    let appel = matches!(precedent, Some(Tok::Fonction(_)));
                    self.cadres.push(Cadre {
                        position: j.position,
                        appel,
                        virgules: 0,
                    });
                    self.ops.push(j.clone());
                    self.attend_operande = true;
                }

                Tok::Virgule => {
                    match self.cadres.last() {
                        Some(c) if c.appel => {}
                        _ => {
                            self.signaler(ErreurCalcul::structure(
                                j.position,
                                "virgule hors d'un appel de fonction",
                            ))?;
                            continue;
                        }
                    }
                    if self.attend_operande {
                        self.signaler(ErreurCalcul::structure(j.position, "argument vide"))?;
                    }
                    self.vider_jusqu_a_parenthese();
                    if let Some(c) = self.cadres.last_mut() {
                        c.virgules += 1;
                    }
                    self.attend_operande = true;
                }

                Tok::ParD => {
                    let Some(cadre) = self.cadres.pop() else {
                        self.signaler(ErreurCalcul::structure(
                            j.position,
                            "')' sans '(' correspondante",
                        ))?;
                        continue;
                    };
                    let juste_ouvert = matches!(precedent, Some(Tok::ParG));

                    let nb_args = if cadre.appel && juste_ouvert {
                        0
                    } else {
                        if self.attend_operande {
                            let message = if juste_ouvert {
                                "parenthèses vides"
                            } else if cadre.appel && matches!(precedent, Some(Tok::Virgule)) {
                                "argument vide"
                            } else {
                                "opérande manquant avant ')'"
                            };
                            self.signaler(ErreurCalcul::structure(j.position, message))?;
                        }
                        cadre.virgules + 1
                    };

                    self.vider_jusqu_a_parenthese();
                    self.ops.pop(); // '('

                    if cadre.appel {
                        if let Some(mut f) = self.ops.pop() {
                            f.nb_args = Some(nb_args);
                            self.sortie.push(f);
                        }
                    }
                    self.attend_operande = false;
                }

                Tok::Fin => break,
            }
            precedent = Some(&j.tok);
        }

        if self.sortie.is_empty() && self.ops.is_empty() && self.cadres.is_empty() {
            let position = jetons.first().map_or(0, |j| j.position);
            self.signaler(ErreurCalcul::structure(position, "expression vide"))?;
        } else if self.attend_operande {
            let position = jetons.last().map_or(0, |j| j.position);
            self.signaler(ErreurCalcul::structure(
                position,
                "expression incomplète (opérateur en fin d'expression)",
            ))?;
        }

        // fin : tout ce qui reste sort, sauf les '(' non fermées
        while let Some(top) = self.ops.pop() {
            if top.tok == Tok::ParG {
                continue;
            }
            if matches!(top.tok, Tok::Fonction(_)) {
                continue;
            }
            self.sortie.push(top);
        }
        for cadre in std::mem::take(&mut self.cadres) {
            self.signaler(ErreurCalcul::structure(cadre.position, "'(' non fermée"))?;
        }

        Ok((self.sortie, self.erreurs.unwrap_or_default()))
    }
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   jetons: [max ( 1 , 2 ) + 3]
///   rpn:    [1 2 max/2 3 +]
pub fn to_rpn(jetons: &[Jeton], table: &TableOperateurs) -> Resultat<Vec<Jeton>> {
    let (rpn, _) = Analyseur::new(table, false).analyser(jetons)?;
    trace!("rpn: {}", format_rpn(&rpn));
    Ok(rpn)
}

/// Même analyse en mode collecte : tous les problèmes de structure.
pub fn validate(jetons: &[Jeton], table: &TableOperateurs) -> Vec<ErreurCalcul> {
    match Analyseur::new(table, true).analyser(jetons) {
        Ok((_, erreurs)) => erreurs,
        Err(e) => vec![e],
    }
}

/// Format utilitaire (debug/“démarche”) : RPN en texte.
pub fn format_rpn(rpn: &[Jeton]) -> String {
    rpn.iter()
        .map(|j| j.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::super::fonctions::RegistreFonctions;
    use super::super::jetons::tokenize;
    use super::super::operateurs::{self, Associativite, DescripteurOperateur};
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn table() -> TableOperateurs {
        let mut t = TableOperateurs::new();
        t.enregistrer_operateur(DescripteurOperateur::binaire(
            "^",
            9,
            Associativite::Droite,
            operateurs::puissance,
            "puissance",
        ));
        t.enregistrer_operateur(DescripteurOperateur::binaire(
            "%",
            6,
            Associativite::Gauche,
            operateurs::modulo,
            "reste",
        ));
        t
    }

    fn rpn(src: &str) -> Resultat<String> {
        let t = table();
        let r = RegistreFonctions::standard();
        let jetons = tokenize(src, &t, &r)?;
        to_rpn(&jetons, &t).map(|v| format_rpn(&v))
    }

    fn erreurs(src: &str) -> Vec<ErreurCalcul> {
        let t = table();
        let r = RegistreFonctions::standard();
        validate(&tokenize(src, &t, &r).unwrap(), &t)
    }

    #[rstest]
    #[case("2 + 3 * 4", "2 3 4 * +")]
    #[case("(2 + 3) * 4", "2 3 + 4 *")]
    #[case("10 / 2 - 3", "10 2 / 3 -")]
    #[case("2 ^ 3 ^ 2", "2 3 2 ^ ^")]
    #[case("2 ** 3 ** 2", "2 3 2 ** **")]
    #[case("-2 ^ 2", "-2 2 ^")]
    #[case("-x ^ 2", "x 2 ^ -")]
    #[case("-x * 2", "x - 2 *")]
    #[case("1 < 2 && 3 >= 2 || !a", "1 2 < 3 2 >= && a ! ||")]
    #[case("7 % 4 * 2", "7 4 % 2 *")]
    fn precedence_et_associativite(#[case] src: &str, #[case] attendu: &str) {
        assert_eq!(rpn(src).unwrap(), attendu);
    }

    #[rstest]
    #[case("sin(pi / 2)", "pi 2 / sin/1")]
    #[case("max(1, 2, 3)", "1 2 3 max/3")]
    #[case("max(1, min(2, 3), 4) + 1", "1 2 3 min/2 4 max/3 1 +")]
    #[case("atan2(1, -1)", "1 -1 atan2/2")]
    #[case("sum()", "sum/0")]
    #[case("pow((1 + 2), 3)", "1 2 + 3 pow/2")]
    fn appels_de_fonction_avec_arite(#[case] src: &str, #[case] attendu: &str) {
        assert_eq!(rpn(src).unwrap(), attendu);
    }

    #[rstest]
    #[case("(2 + 3")]
    #[case("2 + 3)")]
    #[case("2 +")]
    #[case("2 3")]
    #[case("1, 2")]
    #[case("max(1, , 2)")]
    #[case("max(1, 2,)")]
    #[case("sin 2")]
    #[case("()")]
    #[case("* 2")]
    #[case("")]
    fn erreurs_de_structure(#[case] src: &str) {
        match rpn(src) {
            Err(e) => assert!(e.est_structurelle(), "{src:?} : {e:?}"),
            Ok(r) => panic!("{src:?} accepté : {r}"),
        }
    }

    #[test]
    fn validate_collecte_plusieurs_erreurs() {
        assert!(erreurs("max(1, 2) * (3 + 4)").is_empty());

        let e = erreurs("(1 , 2) + (3");
        // virgule hors appel + '(' non fermée
        assert_eq!(e.len(), 2, "{e:?}");
        assert!(e.iter().all(|e| e.est_structurelle()));

        let e = erreurs("(2 + 3");
        assert!(matches!(e.as_slice(), [ErreurCalcul::Structure { position: 0, .. }]));
    }
}
