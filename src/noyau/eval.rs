//! Noyau: évaluation de la RPN
//!
//! pile de valeurs explicite :
//!   nombre -> littéral lu selon le régime puis normalisé (gardes IEEE-754, arrondi décimal)
//!   constante / variable -> valeur normalisée
//!   opérateur -> dépile 1 ou 2 opérandes (b d'abord), applique, normalise
//!   fonction -> dépile exactement nb_args (fixé par le parseur), angles, applique, normalise
//!
//! Remarque : en mode complexe on/auto, un calcul réel qui rend NaN est relancé
//! avec des arguments complexes (sqrt(-1) = i, ln(-1) = iπ, asin(2), …).

use log::{debug, trace};
use num_bigint::BigInt;
use num_traits::{One, Zero};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use super::erreurs::{ErreurCalcul, Resultat};
use super::fonctions::{DescripteurFonction, RegistreFonctions, RoleAngle};
use super::jetons::{Jeton, Tok};
use super::modes::{Angle, Modes, PolitiqueComplexe, Regime};
use super::nombres::{self, Valeur};
use super::operateurs::TableOperateurs;
use super::trig::{trig_special, TrigFn, TrigOutcome};

/// Tout ce dont l'évaluateur a besoin, passé explicitement.
#[derive(Clone, Copy)]
pub struct Contexte<'a> {
    pub modes: &'a Modes,
    pub table: &'a TableOperateurs,
    pub registre: &'a RegistreFonctions,
    pub variables: &'a BTreeMap<String, Valeur>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub valeur: Valeur,
    /// opérateurs + appels de fonction appliqués
    pub operations: usize,
    pub duree: Duration,
}

/// Évalue une RPN produite par `rpn::to_rpn`.
pub fn evaluer(rpn: &[Jeton], ctx: &Contexte<'_>) -> Resultat<Evaluation> {
    let debut = Instant::now();
    let modes = ctx.modes;
    let mut pile: Vec<Valeur> = Vec::with_capacity(rpn.len());
    let mut operations = 0usize;

    for j in rpn {
        match &j.tok {
            Tok::Nombre(texte) => pile.push(modes.normaliser(modes.lire_litteral(texte)?)?),

            Tok::Constante(nom) => {
                let c = ctx
                    .table
                    .get_constant(nom)
                    .ok_or_else(|| ErreurCalcul::IdentifiantInconnu(nom.clone()))?;
                let v = match (modes.regime(), c.exacte) {
                    (Regime::Decimal, Some(exacte)) => Valeur::Decimal(exacte(modes.precision())?),
                    _ => c.valeur.clone(),
                };
                pile.push(modes.normaliser(v)?);
            }

            Tok::Variable(nom) => {
                let v = ctx
                    .variables
                    .get(nom)
                    .ok_or_else(|| ErreurCalcul::IdentifiantInconnu(nom.clone()))?;
                pile.push(modes.normaliser(v.clone())?);
            }

            Tok::Operateur(s) | Tok::Unaire(s) => {
                let unaire = matches!(j.tok, Tok::Unaire(_));
                let d = if unaire {
                    ctx.table.get_unary(s)
                } else {
                    ctx.table.get_operator(s)
                }
                .ok_or_else(|| ErreurCalcul::IdentifiantInconnu(format!("opérateur {s}")))?;

                let args = depiler(&mut pile, d.arite as usize, j)?;
                let r = appliquer_avec_relance(modes, &args, |a| (d.appliquer)(a))?;
                trace!("{s} -> {r}");
                pile.push(modes.normaliser(r)?);
                operations += 1;
            }

            Tok::Fonction(nom) => {
                let f = ctx
                    .registre
                    .get_function(nom)
                    .ok_or_else(|| ErreurCalcul::IdentifiantInconnu(nom.clone()))?;
                let n = j.nb_args.ok_or_else(|| {
                    ErreurCalcul::structure(j.position, format!("appel '{nom}' sans arguments résolus"))
                })?;
                if !f.arite.accepte(n) {
                    return Err(ErreurCalcul::arite(nom, f.arite, n));
                }

                let args = depiler(&mut pile, n, j)?;
                let r = appeler(f, args, modes)?;
                trace!("{nom}/{n} -> {r}");
                pile.push(modes.normaliser(r)?);
                operations += 1;
            }

            Tok::ParG | Tok::ParD | Tok::Virgule | Tok::Fin => {
                return Err(ErreurCalcul::structure(
                    j.position,
                    format!("jeton '{}' inattendu en RPN", j.tok),
                ))
            }
        }
    }

    let valeur = match (pile.pop(), pile.is_empty()) {
        (Some(v), true) => v,
        (None, _) => return Err(ErreurCalcul::structure(0, "expression vide")),
        (Some(_), false) => {
            return Err(ErreurCalcul::structure(
                0,
                format!("expression mal formée : {} valeurs restantes", pile.len() + 1),
            ))
        }
    };

    let duree = debut.elapsed();
    debug!("évaluation : {valeur} ({operations} opérations, {duree:?})");
    Ok(Evaluation {
        valeur,
        operations,
        duree,
    })
}

/// Dépile `n` valeurs, dans l'ordre d'empilement.
fn depiler(pile: &mut Vec<Valeur>, n: usize, j: &Jeton) -> Resultat<Vec<Valeur>> {
    if pile.len() < n {
        return Err(ErreurCalcul::structure(
            j.position,
            format!("opérande manquant pour '{}'", j.tok),
        ));
    }
    Ok(pile.split_off(pile.len() - n))
}

/// Applique `f` ; si le résultat réel est NaN et que les complexes sont permis,
/// recommence avec les arguments promus en complexes.
fn appliquer_avec_relance(
    modes: &Modes,
    args: &[Valeur],
    f: impl Fn(&[Valeur]) -> Resultat<Valeur>,
) -> Resultat<Valeur> {
    let r = f(args)?;
    let relance = matches!(r, Valeur::Reel(x) if x.is_nan())
        && modes.complexe() != PolitiqueComplexe::Off
        && !args.iter().any(|a| matches!(a, Valeur::Reel(x) if x.is_nan()));
    if !relance {
        return Ok(r);
    }

    debug!("résultat NaN : relance en complexe");
    let complexes = args
        .iter()
        .map(|a| a.vers_complexe().map(Valeur::Complexe))
        .collect::<Resultat<Vec<_>>>()?;
    f(&complexes)
}

/// Appel de fonction : conversion d'angles, angles remarquables, relance complexe.
fn appeler(f: &DescripteurFonction, mut args: Vec<Valeur>, modes: &Modes) -> Resultat<Valeur> {
    let convertir = modes.angle() != Angle::Rad;

    if f.angle == RoleAngle::Entree && convertir {
        // sec, csc, cot : inverses exacts de cos, sin, tan
        let cible = TrigFn::depuis_nom(&f.nom)
            .map(|t| (t, false))
            .or_else(|| TrigFn::reciproque(&f.nom).map(|t| (t, true)));
        if let (Some((t, inverse)), [x]) = (cible, args.as_slice()) {
            match trig_special(x, modes.angle(), t) {
                Some(TrigOutcome::Valeur(exacte, preuve)) => {
                    debug!("angle remarquable : {preuve}");
                    let v = exacte.valeur(modes.regime(), modes.precision())?;
                    if !inverse {
                        return Ok(v);
                    }
                    if v.est_zero() {
                        return Err(ErreurCalcul::DivisionParZero(format!("{}({x}) : {preuve}", f.nom)));
                    }
                    return nombres::diviser(&Valeur::Entier(BigInt::one()), &v);
                }
                Some(TrigOutcome::Indefini(_)) if inverse => {
                    return Ok(Valeur::Entier(BigInt::zero()));
                }
                Some(TrigOutcome::Indefini(preuve)) => {
                    return Err(ErreurCalcul::invalide(preuve));
                }
                None => {}
            }
        }

        for a in args.iter_mut() {
            if !a.est_complexe() {
                *a = Valeur::Reel(modes.to_radians(a.vers_f64()?));
            }
        }
    }

    let r = appliquer_avec_relance(modes, &args, |a| (f.appliquer)(a))?;

    if f.angle == RoleAngle::Sortie && convertir && !r.est_complexe() {
        return Ok(Valeur::Reel(modes.from_radians(r.vers_f64()?)));
    }
    Ok(r)
}
