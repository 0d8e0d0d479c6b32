// src/app.rs
//
// Calculatrice scientifique : module App (racine)
// -----------------------------------------------
// Rôle:
// - Déclarer les sous-modules (etat.rs + vue.rs)
// - Ré-exporter Session (pour main.rs: use app::Session;)
// - Boucle ligne à ligne sur une entrée quelconque (stdin en pratique)

pub mod etat;
pub mod vue;

pub use etat::{Configuration, Reponse, Session};

use std::io::{self, BufRead, Write};

impl Session {
    /// Lit jusqu'à EOF ou `:quit`. Retourne false si une ligne a échoué.
    pub fn boucle<R: BufRead, W: Write>(&mut self, entree: R, mut sortie: W, invite: bool) -> io::Result<bool> {
        let mut tout_ok = true;
        if invite {
            write!(sortie, "{}", vue::INVITE)?;
            sortie.flush()?;
        }

        for ligne in entree.lines() {
            let reponse = self.traiter_ligne(&ligne?);
            if reponse == Reponse::Quitter {
                break;
            }
            tout_ok &= !est_echec(&reponse);

            let texte = vue::rendre(&reponse, self.demarche);
            if !texte.is_empty() {
                writeln!(sortie, "{texte}")?;
            }
            if invite {
                write!(sortie, "{}", vue::INVITE)?;
                sortie.flush()?;
            }
        }
        Ok(tout_ok)
    }
}

pub fn est_echec(reponse: &Reponse) -> bool {
    match reponse {
        Reponse::Erreur(_) => true,
        Reponse::Calcul(r) | Reponse::Definition { resultat: r, .. } => !r.succes,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn boucle_sans_invite() {
        let mut s = Session::default();
        let entree = "2 ^ 10\n:angle deg\ncos(60)\n:quit\n1 + 1\n";
        let mut sortie = Vec::new();
        let ok = s.boucle(entree.as_bytes(), &mut sortie, false).unwrap();
        assert!(ok);
        let texte = String::from_utf8(sortie).unwrap();
        let lignes: Vec<_> = texte.lines().collect();
        assert_eq!(lignes[0], "= 1024");
        assert_eq!(lignes[2], "= 0.5");
        assert_eq!(lignes.len(), 3);
    }

    #[test]
    fn echec_signale() {
        let mut s = Session::default();
        let mut sortie = Vec::new();
        let ok = s.boucle("1 +\n2\n".as_bytes(), &mut sortie, false).unwrap();
        assert!(!ok);
    }
}
