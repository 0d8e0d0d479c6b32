// src/noyau/jetons.rs
//
// Tokenisation
// ------------
// - nombres : chiffres [. chiffres] [e|E [+-] chiffres] ; un '-' en tête fait partie
//   du littéral en contexte unaire (début, après '(' ',' ou un opérateur) s'il est
//   suivi d'un chiffre ou d'un '.'
// - identifiants [a-zA-Z_][a-zA-Z0-9_]* : fonction / constante (nom en minuscules)
//   ou variable (casse conservée)
// - opérateurs : plus long symbole enregistré ; '-' '+' '!' unaires en contexte unaire
// - π et √ acceptés (constante pi, fonction sqrt)
// - un jeton Fin termine toujours la suite

use std::fmt;

use super::erreurs::{ErreurCalcul, Resultat};
use super::fonctions::RegistreFonctions;
use super::operateurs::TableOperateurs;

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    /// texte du littéral, lu plus tard selon le régime de précision
    Nombre(String),
    Fonction(String),
    Constante(String),
    Variable(String),
    Operateur(String),
    Unaire(String),

    ParG,
    ParD,
    Virgule,
    Fin,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Jeton {
    pub tok: Tok,
    /// index (en caractères) dans l'expression source
    pub position: usize,
    /// nombre d'arguments d'un appel de fonction, fixé par le parseur
    pub nb_args: Option<usize>,
}

impl Jeton {
    pub fn new(tok: Tok, position: usize) -> Self {
        Self {
            tok,
            position,
            nb_args: None,
        }
    }
}

impl fmt::Display for Tok {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tok::Nombre(s)
            | Tok::Fonction(s)
            | Tok::Constante(s)
            | Tok::Variable(s)
            | Tok::Operateur(s)
            | Tok::Unaire(s) => write!(f, "{s}"),
            Tok::ParG => write!(f, "("),
            Tok::ParD => write!(f, ")"),
            Tok::Virgule => write!(f, ","),
            Tok::Fin => Ok(()),
        }
    }
}

impl fmt::Display for Jeton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.tok, self.nb_args) {
            // en RPN, l'appel porte son nombre d'arguments
            (Tok::Fonction(nom), Some(n)) => write!(f, "{nom}/{n}"),
            (tok, _) => write!(f, "{tok}"),
        }
    }
}

/* ------------------------ Lecteur ------------------------ */

struct Lecteur<'a> {
    src: &'a str,
    // (offset en octets, caractère)
    chars: Vec<(usize, char)>,
    i: usize,
    table: &'a TableOperateurs,
    registre: &'a RegistreFonctions,
    sortie: Vec<Jeton>,
    // Some = mode collecte (validate), None = première erreur remontée
    erreurs: Option<Vec<ErreurCalcul>>,
}

impl<'a> Lecteur<'a> {
    fn new(
        src: &'a str,
        table: &'a TableOperateurs,
        registre: &'a RegistreFonctions,
        collecte: bool,
    ) -> Self {
        Self {
            src,
            chars: src.char_indices().collect(),
            i: 0,
            table,
            registre,
            sortie: Vec::new(),
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

    fn car(&self, i: usize) -> Option<char> {
        self.chars.get(i).map(|(_, c)| *c)
    }

    fn reste(&self) -> &'a str {
        match self.chars.get(self.i) {
            Some((o, _)) => &self.src[*o..],
            None => "",
        }
    }

    fn texte(&self, debut: usize, fin: usize) -> String {
        self.chars[debut..fin].iter().map(|(_, c)| *c).collect()
    }

    /// Contexte unaire : début, après '(' ',' ou un opérateur.
    fn contexte_unaire(&self) -> bool {
        match self.sortie.last() {
            None => true,
            Some(j) => matches!(
                j.tok,
                Tok::ParG | Tok::Virgule | Tok::Operateur(_) | Tok::Unaire(_) | Tok::Fonction(_)
            ),
        }
    }

    fn pousser(&mut self, tok: Tok, position: usize) {
        self.sortie.push(Jeton::new(tok, position));
    }

    fn lire(mut self) -> Result<(Vec<Jeton>, Vec<ErreurCalcul>), ErreurCalcul> {
        while let Some(c) = self.car(self.i) {
            if c.is_whitespace() {
                self.i += 1;
                continue;
            }

            let pos = self.i;
            match c {
                '(' => {
                    self.pousser(Tok::ParG, pos);
                    self.i += 1;
                }
                ')' => {
                    self.pousser(Tok::ParD, pos);
                    self.i += 1;
                }
                ',' => {
                    self.pousser(Tok::Virgule, pos);
                    self.i += 1;
                }
                'π' => {
                    self.pousser(Tok::Constante("pi".into()), pos);
                    self.i += 1;
                }
                '√' => {
                    self.pousser(Tok::Fonction("sqrt".into()), pos);
                    self.i += 1;
                }
                c if c.is_ascii_digit() || c == '.' => self.nombre(false)?,
                '-' if self.contexte_unaire()
                    && self
                        .car(self.i + 1)
                        .is_some_and(|d| d.is_ascii_digit() || d == '.') =>
                {
                    self.nombre(true)?
                }
                c if c.is_ascii_alphabetic() || c == '_' => self.identifiant(),
                _ => self.operateur(c)?,
            }
        }

        let fin = self.chars.len();
        self.pousser(Tok::Fin, fin);
        Ok((self.sortie, self.erreurs.unwrap_or_default()))
    }

    fn nombre(&mut self, signe: bool) -> Resultat<()> {
        let debut = self.i;
        if signe {
            self.i += 1;
        }
        while self.car(self.i).is_some_and(|c| c.is_ascii_digit() || c == '.') {
            self.i += 1;
        }
        if matches!(self.car(self.i), Some('e' | 'E')) {
            self.i += 1;
            if matches!(self.car(self.i), Some('+' | '-')) {
                self.i += 1;
            }
            while self.car(self.i).is_some_and(|c| c.is_ascii_digit()) {
                self.i += 1;
            }
        }

        let texte = self.texte(debut, self.i);
        if texte.parse::<f64>().is_err() {
            return self.signaler(ErreurCalcul::lexicale(
                debut,
                format!("nombre invalide: '{texte}'"),
            ));
        }
        self.pousser(Tok::Nombre(texte), debut);
        Ok(())
    }

    fn identifiant(&mut self) {
        let debut = self.i;
        while self
            .car(self.i)
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.i += 1;
        }
        let mot = self.texte(debut, self.i);
        let w = mot.to_lowercase();

        let tok = if self.registre.has_function(&w) {
            Tok::Fonction(w)
        } else if self.table.is_constant(&w) {
            Tok::Constante(w)
        } else {
            Tok::Variable(mot)
        };
        self.pousser(tok, debut);
    }

    fn operateur(&mut self, c: char) -> Resultat<()> {
        let pos = self.i;
        let Some(symbole) = self.table.plus_long_symbole(self.reste()) else {
            self.i += 1;
            return self.signaler(ErreurCalcul::lexicale(
                pos,
                format!("caractère inattendu: '{c}'"),
            ));
        };
        let symbole = symbole.to_string();
        self.i += symbole.chars().count();

        let unaire = self.contexte_unaire() && self.table.get_unary(&symbole).is_some();
        if unaire {
            self.pousser(Tok::Unaire(symbole), pos);
        } else if self.table.get_operator(&symbole).is_some() {
            self.pousser(Tok::Operateur(symbole), pos);
        } else if self.table.get_unary(&symbole).is_some() {
            return self.signaler(ErreurCalcul::lexicale(
                pos,
                format!("opérateur préfixe '{symbole}' mal placé"),
            ));
        } else {
            // symbole binaire en contexte unaire : le parseur le signalera
            self.pousser(Tok::Operateur(symbole), pos);
        }
        Ok(())
    }
}

/* ------------------------ API ------------------------ */

/// Tokenise une expression ; première erreur lexicale remontée.
pub fn tokenize(
    src: &str,
    table: &TableOperateurs,
    registre: &RegistreFonctions,
) -> Resultat<Vec<Jeton>> {
    let (jetons, _) = Lecteur::new(src, table, registre, false).lire()?;
    Ok(jetons)
}

/// Passe non bloquante : tous les problèmes détectables au niveau lexical.
pub fn validate(
    src: &str,
    table: &TableOperateurs,
    registre: &RegistreFonctions,
) -> Vec<ErreurCalcul> {
    if src.trim().is_empty() {
        return vec![ErreurCalcul::structure(0, "expression vide")];
    }

    let (jetons, mut erreurs) = match Lecteur::new(src, table, registre, true).lire() {
        Ok(r) => r,
        Err(e) => return vec![e],
    };

    // compteur de parenthèses : jamais négatif, nul à la fin
    let mut profondeur = 0usize;
    let mut ouvrantes = Vec::new();
    let mut precedent: Option<&Jeton> = None;

    for j in &jetons {
        match &j.tok {
            Tok::ParG => {
                profondeur += 1;
                ouvrantes.push(j.position);
            }
            Tok::ParD => {
                if profondeur == 0 {
                    erreurs.push(ErreurCalcul::structure(j.position, "')' sans '(' correspondante"));
                } else {
                    profondeur -= 1;
                    ouvrantes.pop();
                }
            }
            Tok::Operateur(s) => {
                if let Some(Jeton { tok: Tok::Operateur(p), .. }) = precedent {
                    erreurs.push(ErreurCalcul::structure(
                        j.position,
                        format!("opérateurs consécutifs '{p}' '{s}'"),
                    ));
                }
            }
            _ => {}
        }
        precedent = Some(j);
    }
    for p in ouvrantes {
        erreurs.push(ErreurCalcul::structure(p, "'(' non fermée"));
    }

    erreurs
}

/// Texte canonique d'une suite de jetons (re-tokenisable à l'identique).
pub fn format_jetons(jetons: &[Jeton]) -> String {
    jetons
        .iter()
        .filter(|j| j.tok != Tok::Fin)
        .map(|j| j.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
