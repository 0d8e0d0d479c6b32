// src/main.rs
//
// Calculatrice scientifique : point d'entrée terminal
// ---------------------------------------------------
// - Expressions en arguments : évaluées dans l'ordre (même session, `ans` suit)
// - Sans argument : boucle ligne à ligne sur stdin
// - RUST_LOG=debug pour suivre le pipeline (env_logger)

mod app;

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::Parser;
use log::error;

use app::{Configuration, Session};
use calculatrice_sci::noyau::modes::PRECISION_DEFAUT;
use calculatrice_sci::CAPACITE_HISTORIQUE;

/// Calculatrice scientifique (réels, complexes, entiers exacts, décimaux exacts).
#[derive(Parser, Debug)]
#[command(name = "calculatrice-sci", version, about)]
struct Options {
    /// Unité d'angle : rad, deg, grad
    #[arg(long, default_value = "rad")]
    angle: String,

    /// Régime numérique : ieee754, bigint, decimal
    #[arg(long, default_value = "ieee754")]
    regime: String,

    /// Politique complexe : off, on, auto
    #[arg(long = "complex", default_value = "off")]
    complexe: String,

    /// Chiffres significatifs en régime decimal
    #[arg(long, default_value_t = PRECISION_DEFAUT)]
    precision: u32,

    /// Arrondi : nearest, up, down, towardZero
    #[arg(long = "rounding", default_value = "nearest")]
    arrondi: String,

    /// Nombre d'entrées gardées dans l'historique
    #[arg(long = "history", default_value_t = CAPACITE_HISTORIQUE)]
    historique: usize,

    /// Affiche jetons et RPN avec chaque résultat
    #[arg(long)]
    demarche: bool,

    /// Expressions (ou commandes `:`) à évaluer
    expressions: Vec<String>,
}

impl Options {
    fn configuration(&self) -> Configuration {
        Configuration {
            angle: self.angle.clone(),
            regime: self.regime.clone(),
            complexe: self.complexe.clone(),
            precision: self.precision,
            arrondi: self.arrondi.clone(),
            historique: self.historique,
            demarche: self.demarche,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let options = Options::parse();

    let mut session = match Session::depuis_configuration(&options.configuration()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("erreur: {e}");
            return ExitCode::from(2);
        }
    };

    let resultat = if options.expressions.is_empty() {
        let stdin = io::stdin();
        let invite = stdin.is_terminal();
        session.boucle(stdin.lock(), io::stdout().lock(), invite)
    } else {
        let lignes = options.expressions.join("\n");
        session.boucle(lignes.as_bytes(), io::stdout().lock(), false)
    };

    match resultat {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("entrée/sortie: {e}");
            ExitCode::FAILURE
        }
    }
}
