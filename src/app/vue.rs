// src/app/vue.rs
//
// Vue terminal
// ------------
// - Met en forme une Reponse (aucune logique de calcul)
// - Résultat : "= valeur" ; erreur : "erreur: message"
// - Démarche optionnelle : jetons, RPN, opérations, durée

use std::fmt::Write as _;

use calculatrice_sci::noyau::calculatrice::{ResultatCalcul, Validation};
use calculatrice_sci::noyau::format::formater;
use calculatrice_sci::Etape;

use super::etat::Reponse;

pub const INVITE: &str = "> ";

pub const AIDE: &str = "\
expressions : 2 + 3 * 4, sin(pi / 6), sqrt(-4), max(1, 2, 3), 2 ^ 10
commandes   :
  :angle rad|deg|grad            :regime ieee754|bigint|decimal
  :complex off|on|auto           :precision N   :rounding nearest|up|down|towardZero
  :let x = expr                  :vars          :history
  :functions [catégorie]         :check expr    :modes
  :reset                         :help          :quit";

/// Texte à afficher pour une réponse (vide : rien à afficher).
pub fn rendre(reponse: &Reponse, demarche: bool) -> String {
    match reponse {
        Reponse::Rien | Reponse::Quitter => String::new(),
        Reponse::Calcul(r) => rendre_resultat(r, demarche),
        Reponse::Definition { nom, resultat } => match &resultat.formate {
            Some(f) if resultat.succes => format!("{nom} = {f}"),
            _ => rendre_resultat(resultat, demarche),
        },
        Reponse::Validation(v) => rendre_validation(v),
        Reponse::Modes(m) => m.to_string(),
        Reponse::Variables(vars) if vars.is_empty() => "(aucune variable)".to_string(),
        Reponse::Variables(vars) => vars
            .iter()
            .map(|(n, v)| format!("{n} = {}", formater(v)))
            .collect::<Vec<_>>()
            .join("\n"),
        Reponse::Historique(h) if h.is_empty() => "(historique vide)".to_string(),
        Reponse::Historique(h) => h
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{:>3}  {} = {}   [{}]", i + 1, e.expression, e.formate, e.modes))
            .collect::<Vec<_>>()
            .join("\n"),
        Reponse::Fonctions(groupes) => {
            let mut s = String::new();
            for (categorie, docs) in groupes {
                let _ = writeln!(s, "[{categorie}]");
                for d in docs {
                    let _ = writeln!(s, "  {d}");
                }
            }
            s.trim_end().to_string()
        }
        Reponse::Aide => AIDE.to_string(),
        Reponse::Erreur(msg) => format!("erreur: {msg}"),
    }
}

fn rendre_resultat(r: &ResultatCalcul, demarche: bool) -> String {
    let mut s = match (&r.formate, &r.erreur) {
        (Some(f), _) if r.succes => format!("= {f}"),
        (_, Some(e)) => format!("erreur: {e}"),
        _ => "erreur: résultat indisponible".to_string(),
    };

    if demarche && !r.demarche.jetons.is_empty() {
        let _ = write!(s, "\n  jetons : {}", r.demarche.jetons);
        if !r.demarche.rpn.is_empty() {
            let _ = write!(s, "\n  rpn    : {}", r.demarche.rpn);
        }
        let _ = write!(
            s,
            "\n  {} jetons, {} en RPN, {} opérations, {} µs",
            r.nb_jetons,
            r.longueur_rpn,
            r.operations,
            r.duree.as_micros()
        );
    }
    s
}

fn rendre_validation(v: &Validation) -> String {
    if v.valide {
        return format!("valide ({})", Etape::Complete);
    }
    let mut s = format!("invalide ({})", v.etape);
    for e in &v.erreurs {
        let _ = write!(s, "\n  - {e}");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::super::etat::Session;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resultat_et_demarche() {
        let mut s = Session::default();
        let r = s.traiter_ligne("2 + 3 * 4");
        assert_eq!(rendre(&r, false), "= 14");

        let texte = rendre(&r, true);
        assert!(texte.starts_with("= 14\n  jetons : 2 + 3 * 4"));
        assert!(texte.contains("rpn    : 2 3 4 * +"));
        assert!(texte.contains("2 opérations"));
    }

    #[test]
    fn erreurs_et_validation() {
        let mut s = Session::default();
        assert!(rendre(&s.traiter_ligne("1 / 0"), false).starts_with("erreur: "));
        assert!(rendre(&s.traiter_ligne(":nimporte"), false).starts_with("erreur: "));

        let texte = rendre(&s.traiter_ligne(":check (2+3"), false);
        assert!(texte.starts_with("invalide (tokenization)"));
        assert_eq!(rendre(&s.traiter_ligne(":check 2+3"), false), "valide (complete)");
    }

    #[test]
    fn listes() {
        let mut s = Session::default();
        assert_eq!(rendre(&s.traiter_ligne(":vars"), false), "(aucune variable)");
        s.traiter_ligne(":let r = 3");
        assert_eq!(rendre(&s.traiter_ligne(":vars"), false), "ans = 3\nr = 3");

        let h = rendre(&s.traiter_ligne(":history"), false);
        assert!(h.starts_with("  1  3 = 3   [angle=rad"));

        let f = rendre(&s.traiter_ligne(":functions statistique"), false);
        assert!(f.starts_with("[statistique]\n  sum(x, ...)"));
        assert_eq!(rendre(&s.traiter_ligne(":quit"), false), "");
    }
}
