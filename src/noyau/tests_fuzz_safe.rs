//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - invariant clé : validation « complete » <=> aucune erreur structurelle au calcul

use std::time::{Duration, Instant};

use super::calculatrice::{Calculatrice, Etape};
use super::erreurs::ErreurCalcul;

/* ------------------------ RNG déterministe minimal ------------------------ */

// LCG de Knuth (MMIX), seed fixe par test : les tirages sont rejouables.

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
    fn choix<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.pick(items.len() as u32) as usize]
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération d'expressions (bornée) ------------------------ */

const BINAIRES: [&str; 12] = ["+", "-", "*", "/", "^", "**", "%", "//", "<", "==", "&&", "||"];
const UNAIRES: [&str; 16] = [
    "sin", "cos", "tan", "sqrt", "ln", "exp", "abs", "floor", "round", "gamma", "erf", "atan",
    "sinh", "cbrt", "fact", "sign",
];
const VARIADIQUES: [&str; 5] = ["sum", "avg", "max", "median", "stddev"];

fn gen_nombre(rng: &mut Rng) -> String {
    match rng.pick(6) {
        0 => "0".to_string(),
        1 => format!("{}", rng.pick(10)),
        2 => format!("{}.{}", rng.pick(100), rng.pick(1000)),
        3 => format!("{}e{}", 1 + rng.pick(9), rng.pick(5)),
        4 => format!("-{}", 1 + rng.pick(20)),
        _ => format!("{}", rng.pick(1_000_000)),
    }
}

fn gen_atome(rng: &mut Rng) -> String {
    match rng.pick(5) {
        0 | 1 => gen_nombre(rng),
        2 => rng.choix(&["pi", "e", "tau", "phi"]).to_string(),
        3 => rng.choix(&["x", "y", "ans"]).to_string(),
        _ => "i".to_string(),
    }
}

fn gen_expr(rng: &mut Rng, profondeur: usize) -> String {
    if profondeur == 0 {
        return gen_atome(rng);
    }
    match rng.pick(7) {
        0 => gen_atome(rng),
        1 | 2 => format!(
            "({} {} {})",
            gen_expr(rng, profondeur - 1),
            rng.choix(&BINAIRES),
            gen_expr(rng, profondeur - 1)
        ),
        3 => format!("{}({})", rng.choix(&UNAIRES), gen_expr(rng, profondeur - 1)),
        4 => {
            let n = 1 + rng.pick(4) as usize;
            let args: Vec<String> = (0..n).map(|_| gen_expr(rng, profondeur - 1)).collect();
            format!("{}({})", rng.choix(&VARIADIQUES), args.join(", "))
        }
        5 => format!("-{}", gen_expr(rng, profondeur - 1)),
        _ => format!(
            "atan2({}, {})",
            gen_expr(rng, profondeur - 1),
            gen_expr(rng, profondeur - 1)
        ),
    }
}

/// Soupe de fragments : majoritairement invalide.
fn gen_soupe(rng: &mut Rng) -> String {
    const FRAGMENTS: [&str; 20] = [
        "(", ")", ",", "+", "-", "*", "/", "^", "1", "2.5", "pi", "sin", "max", "x", " ", "!",
        "$", "1e", "//", "==",
    ];
    let n = rng.pick(12) as usize;
    (0..n).map(|_| rng.choix(&FRAGMENTS)).collect()
}

fn calculatrice(regime: &str, complexe: &str) -> Calculatrice {
    let mut c = Calculatrice::new();
    c.set_precision_mode(regime).unwrap();
    c.set_complex_mode(complexe).unwrap();
    c.set_precision(30).unwrap();
    c
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_validation_coherente_avec_calcul() {
    let t0 = Instant::now();
    let max = Duration::from_millis(1500);

    let mut rng = Rng::new(0xC0FFEE_u64);
    let mut vu_ok = 0usize;
    let mut vu_err = 0usize;

    for (regime, complexe) in [("ieee754", "off"), ("ieee754", "auto"), ("bigint", "on"), ("decimal", "off")] {
        let mut c = calculatrice(regime, complexe);
        c.set_variable("x", super::nombres::Valeur::Reel(0.5)).unwrap();

        for _ in 0..60 {
            budget(t0, max);

            let expr = gen_expr(&mut rng, 3);
            let v = c.validate_expression(&expr);
            let r = c.calculate(&expr);

            // expression bien formée : la pile finit à 1 valeur ou l'erreur est numérique / de nom
            assert_eq!(v.etape, Etape::Complete, "expr={expr:?} erreurs={:?}", v.erreurs);
            match r.erreur {
                None => {
                    assert!(r.succes && r.valeur.is_some() && r.formate.is_some());
                    vu_ok += 1;
                }
                Some(e) => {
                    assert!(!e.est_structurelle(), "expr={expr:?} err={e}");
                    vu_err += 1;
                }
            }
        }
    }

    assert!(vu_ok > 20, "trop peu de succès: {vu_ok}");
    assert!(vu_err > 0, "aucune erreur vue : fuzz trop sage");
}

#[test]
fn fuzz_safe_soupe_sans_panique_ni_mutation() {
    let t0 = Instant::now();
    let max = Duration::from_millis(1000);

    let mut rng = Rng::new(0xBADC0DE_u64);
    let mut c = Calculatrice::new();
    c.calculate("41 + 1");

    for _ in 0..400 {
        budget(t0, max);

        let expr = gen_soupe(&mut rng);
        let v = c.validate_expression(&expr);
        let avant = (c.get_variable("ans").cloned(), c.history().len());
        let r = c.calculate(&expr);

        if !v.valide {
            assert!(!r.succes, "validation refuse mais calcul réussi: {expr:?}");
            assert!(matches!(r.erreur, Some(ref e) if e.est_structurelle()), "expr={expr:?}");
        }
        if !r.succes {
            assert_eq!((c.get_variable("ans").cloned(), c.history().len()), avant);
        }
    }
}

#[test]
fn fuzz_safe_determinisme() {
    let t0 = Instant::now();
    let max = Duration::from_millis(1000);

    let tirage = |seed: u64| {
        let mut rng = Rng::new(seed);
        let mut c = calculatrice("ieee754", "auto");
        (0..80)
            .map(|_| {
                let expr = gen_expr(&mut rng, 3);
                let r = c.calculate(&expr);
                (r.formate, r.erreur.map(|e| e.to_string()))
            })
            .collect::<Vec<_>>()
    };

    let a = tirage(0x5EED);
    budget(t0, max);
    let b = tirage(0x5EED);
    budget(t0, max);
    assert_eq!(a, b);
}

#[test]
fn fuzz_safe_division_par_zero_jamais_silencieuse() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let mut rng = Rng::new(0xD1F_u64);
    let mut c = Calculatrice::new();

    for _ in 0..100 {
        budget(t0, max);

        let op = rng.choix(&["/", "%", "//"]);
        let zero = if rng.coin() { "0" } else { "(1 - 1)" };
        let expr = format!("{} {op} {zero}", gen_nombre(&mut rng));
        assert!(
            matches!(c.calculate(&expr).erreur, Some(ErreurCalcul::DivisionParZero(_))),
            "expr={expr:?}"
        );
    }
}
