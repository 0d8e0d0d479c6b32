//! Tests scientifiques (campagne) : invariants + limites contrôlées.
//!
//! But : vérifier les propriétés du moteur complet (façade) sans faire chauffer la machine.
//! - budget temps global sur les tests de stress
//! - tailles bornées (profondeur, longueur)

use std::time::{Duration, Instant};

use num_bigint::BigInt;
use pretty_assertions::assert_eq;
use rstest::rstest;

use super::calculatrice::{Calculatrice, Etape};
use super::complexe::{self, Complexe};
use super::erreurs::{ErreurCalcul, ErreurNumerique};
use super::fonctions::Arite;
use super::jetons;
use super::nombres::{self, Valeur};
use super::operateurs::TableOperateurs;
use super::rpn;

fn calc_ok(c: &mut Calculatrice, expr: &str) -> String {
    let r = c.calculate(expr);
    match (r.succes, r.formate) {
        (true, Some(f)) => f,
        _ => panic!("expr={expr:?} err={:?}", r.erreur),
    }
}

fn calc_err(c: &mut Calculatrice, expr: &str) -> ErreurCalcul {
    c.calculate(expr)
        .erreur
        .unwrap_or_else(|| panic!("expr={expr:?} aurait dû échouer"))
}

fn reel(c: &mut Calculatrice, expr: &str) -> f64 {
    match c.calculate(expr).valeur {
        Some(Valeur::Reel(x)) => x,
        autre => panic!("expr={expr:?} : réel attendu, reçu {autre:?}"),
    }
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Précédence / associativité ------------------------ */

#[rstest]
#[case("2+3*4", "14")]
#[case("2^3^2", "512")]
#[case("(2^3)^2", "64")]
#[case("10/2-3", "2")]
#[case("2 ** 3 ** 2", "512")]
#[case("7 - 2 - 1", "4")]
#[case("100 / 10 / 5", "2")]
#[case("2 * -3", "-6")]
#[case("-(3) + 1", "-2")]
#[case("1 + 2 == 3", "1")]
#[case("2 < 1 || 3 >= 3", "1")]
#[case("max(1, 4, 2) + min(3, 5)", "7")]
fn sci_precedence(#[case] expr: &str, #[case] attendu: &str) {
    let mut c = Calculatrice::new();
    assert_eq!(calc_ok(&mut c, expr), attendu, "expr={expr:?}");
}

/* ------------------------ Parenthèses ------------------------ */

#[rstest]
#[case("(2+3")]
#[case("2+3)")]
#[case("((1)")]
#[case(")(")]
#[case("sin(1")]
fn sci_parentheses_desequilibrees(#[case] expr: &str) {
    let c = Calculatrice::new();
    let v = c.validate_expression(expr);
    assert!(!v.valide);
    assert_ne!(v.etape, Etape::Complete);
    assert!(v.erreurs.iter().all(|e| e.est_structurelle()), "{:?}", v.erreurs);

    // les deux chemins de validation rejettent
    let table = TableOperateurs::new();
    let registre = super::fonctions::RegistreFonctions::standard();
    assert!(!jetons::validate(expr, &table, &registre).is_empty());
    if let Ok(j) = jetons::tokenize(expr, &table, &registre) {
        assert!(!rpn::validate(&j, &table).is_empty());
        assert!(rpn::to_rpn(&j, &table).is_err());
    }
}

#[test]
fn sci_validation_etape() {
    let c = Calculatrice::new();
    let v = c.validate_expression("(2+3");
    assert!(matches!(v.etape, Etape::Tokenisation | Etape::Analyse));
    assert!(v.erreurs[0].to_string().contains('('), "{}", v.erreurs[0]);
}

/* ------------------------ Promotion ------------------------ */

#[test]
fn sci_promotion_reel_complexe() {
    let z = Valeur::Complexe(Complexe::new(1.0, 2.0));
    for x in [Valeur::Reel(3.0), Valeur::Entier(BigInt::from(3))] {
        assert!(matches!(nombres::ajouter(&x, &z), Ok(Valeur::Complexe(_))));
        assert!(matches!(nombres::multiplier(&z, &x), Ok(Valeur::Complexe(_))));
    }
    assert!(complexe::est_reel(&Complexe::new(4.0, 0.0)));
    assert!(!complexe::est_reel(&Complexe::new(4.0, 1e-3)));
}

/* ------------------------ Division par zéro ------------------------ */

#[rstest]
#[case("5/0")]
#[case("5%0")]
#[case("5//0")]
#[case("0/0")]
#[case("1 / (2 - 2)")]
fn sci_division_par_zero(#[case] expr: &str) {
    for regime in ["ieee754", "bigint", "decimal"] {
        let mut c = Calculatrice::new();
        c.set_precision_mode(regime).unwrap();
        assert!(
            matches!(calc_err(&mut c, expr), ErreurCalcul::DivisionParZero(_)),
            "expr={expr:?} régime={regime}"
        );
    }
}

/* ------------------------ Enregistrement idempotent ------------------------ */

#[test]
fn sci_enregistrement_idempotent() {
    let mut c = Calculatrice::new();
    assert!(c.register_function("f", Arite::Fixe(1), |_| Ok(Valeur::Reel(1.0)), "un"));
    assert!(!c.register_function("f", Arite::Fixe(1), |_| Ok(Valeur::Reel(2.0)), "deux"));
    assert_eq!(calc_ok(&mut c, "f(0)"), "1");

    let doc = c
        .get_functions()
        .into_iter()
        .find(|d| d.nom == "f")
        .map(|d| d.description.clone());
    assert_eq!(doc.as_deref(), Some("un"));
}

/* ------------------------ Modes d'angle ------------------------ */

#[test]
fn sci_sensibilite_angle() {
    let mut c = Calculatrice::new();
    let rad = reel(&mut c, "sin(30)");
    c.set_angle_mode("deg").unwrap();
    let deg = reel(&mut c, "sin(30)");

    assert!((rad - 30f64.sin()).abs() < 1e-15);
    assert!((deg - (30.0 * std::f64::consts::PI / 180.0).sin()).abs() < 1e-15);
    assert_eq!(deg, 0.5);
    assert_ne!(rad, deg);

    c.set_angle_mode("grad").unwrap();
    assert_eq!(calc_ok(&mut c, "cos(200)"), "-1");
    assert_eq!(calc_ok(&mut c, "asin(1)"), "100");
}

#[test]
fn sci_tangente_indefinie_en_degres() {
    let mut c = Calculatrice::new();
    c.set_angle_mode("deg").unwrap();
    match calc_err(&mut c, "tan(90)") {
        ErreurCalcul::Numerique(ErreurNumerique::OperationInvalide(m)) => {
            assert!(m.contains("indéfini"), "{m}")
        }
        autre => panic!("reçu {autre:?}"),
    }
    assert_eq!(calc_ok(&mut c, "tan(45)"), "1");
}

#[rstest]
#[case("sec(60)", "2")]
#[case("csc(30)", "2")]
#[case("cot(45)", "1")]
#[case("cot(90)", "0")]
#[case("sec(180)", "-1")]
fn sci_inverses_trig_exacts_en_degres(#[case] expr: &str, #[case] attendu: &str) {
    let mut c = Calculatrice::new();
    c.set_angle_mode("deg").unwrap();
    assert_eq!(calc_ok(&mut c, expr), attendu, "expr={expr:?}");
}

#[rstest]
#[case("sec(90)")]
#[case("csc(180)")]
#[case("cot(0)")]
#[case("csc(0)")]
fn sci_inverses_trig_aux_zeros(#[case] expr: &str) {
    let mut c = Calculatrice::new();
    c.set_angle_mode("deg").unwrap();
    assert!(
        matches!(calc_err(&mut c, expr), ErreurCalcul::DivisionParZero(_)),
        "expr={expr:?}"
    );
}

/* ------------------------ Aller-retour jetons ------------------------ */

#[rstest]
#[case("2+3*4")]
#[case("  sin( pi/6 )+max(1,2,  3)")]
#[case("-2^2 // 3 % 5")]
#[case("x1 * (ans - 1e-3)")]
#[case("sum()")]
fn sci_aller_retour_jetons(#[case] expr: &str) {
    let mut c = Calculatrice::new();
    let forme = c.calculate(expr).demarche.jetons;
    assert!(!forme.is_empty());
    let reforme = c.calculate(&forme).demarche.jetons;
    assert_eq!(reforme, forme);
}

/* ------------------------ Régimes exacts ------------------------ */

#[test]
fn sci_decimal_exact() {
    let mut c = Calculatrice::new();
    c.set_precision_mode("decimal").unwrap();
    assert_eq!(calc_ok(&mut c, "0.1 + 0.2"), "0.3");
    assert_eq!(calc_ok(&mut c, "0.1 + 0.2 == 0.3"), "1");
    assert_eq!(calc_ok(&mut c, "1.10 * 3"), "3.3");
    assert!(matches!(c.calculate("0.1 + 0.2").valeur, Some(Valeur::Decimal(_))));
}

#[test]
fn sci_bigint_exact() {
    let mut c = Calculatrice::new();
    c.set_precision_mode("bigint").unwrap();
    assert_eq!(calc_ok(&mut c, "2 ** 100"), "1267650600228229401496703205376");
    assert_eq!(calc_ok(&mut c, "fact(25)"), "15511210043330985984000000");
    assert_eq!(calc_ok(&mut c, "ans // 1000000"), "15511210043330985984");
}

#[rstest]
#[case("nearest", "0.667", "-0.667")]
#[case("up", "0.667", "-0.666")]
#[case("down", "0.666", "-0.667")]
#[case("towardZero", "0.666", "-0.666")]
fn sci_politique_arrondi_decimal(#[case] politique: &str, #[case] pos: &str, #[case] neg: &str) {
    let mut c = Calculatrice::new();
    c.set_precision_mode("decimal").unwrap();
    c.set_precision(3).unwrap();
    c.set_rounding_mode(politique).unwrap();
    assert_eq!(calc_ok(&mut c, "2/3"), pos);
    assert_eq!(calc_ok(&mut c, "-2/3"), neg);
}

#[test]
fn sci_litteral_decimal_arrondi_comme_un_resultat() {
    let mut c = Calculatrice::new();
    c.set_precision_mode("decimal").unwrap();
    c.set_precision(3).unwrap();
    assert_eq!(calc_ok(&mut c, "0.123456789"), "0.123");
    assert_eq!(calc_ok(&mut c, "0.123456789"), calc_ok(&mut c, "0.123456789 + 0"));
    assert_eq!(calc_ok(&mut c, "0.1235"), "0.124");
}

#[test]
fn sci_exposant_extreme_en_decimal() {
    let mut c = Calculatrice::new();
    c.set_precision_mode("decimal").unwrap();
    for expr in ["1e-9223372036854775808", "1e9223372036854775807", "2 * 1e-9223372036854775808"] {
        let r = c.calculate(expr);
        assert!(!r.succes, "expr={expr:?}");
        assert!(c.history().is_empty());
    }
}

#[test]
fn sci_decimal_sous_normal_represente() {
    let mut c = Calculatrice::new();
    assert!(matches!(
        calc_err(&mut c, "exp(-710)"),
        ErreurCalcul::Numerique(ErreurNumerique::SousDepassement)
    ));
    c.set_precision_mode("decimal").unwrap();
    assert_eq!(calc_ok(&mut c, "exp(-710)"), "0");
}

/* ------------------------ Gardes IEEE-754 ------------------------ */

#[rstest]
#[case("1e400", ErreurNumerique::Depassement)]
#[case("-1e400", ErreurNumerique::Depassement)]
#[case("1e400 > 5", ErreurNumerique::Depassement)]
#[case("1e-320", ErreurNumerique::SousDepassement)]
fn sci_litteral_hors_plage_ieee754(#[case] expr: &str, #[case] attendue: ErreurNumerique) {
    let mut c = Calculatrice::new();
    match calc_err(&mut c, expr) {
        ErreurCalcul::Numerique(e) => assert_eq!(e, attendue, "expr={expr:?}"),
        autre => panic!("expr={expr:?} reçu {autre:?}"),
    }
    assert!(c.get_variable("ans").is_none());
}

/* ------------------------ Complexes ------------------------ */

#[test]
fn sci_politique_complexe() {
    let mut c = Calculatrice::new();
    assert!(!c.calculate("sqrt(-4)").succes);

    c.set_complex_mode("on").unwrap();
    assert_eq!(calc_ok(&mut c, "sqrt(-4)"), "2i");
    assert_eq!(calc_ok(&mut c, "(1 + i) * (1 - i)"), "2");

    c.set_complex_mode("auto").unwrap();
    assert_eq!(c.calculate("i * i").valeur, Some(Valeur::Reel(-1.0)));
}

/* ------------------------ ans + historique ------------------------ */

#[test]
fn sci_ans_et_historique() {
    let mut c = Calculatrice::avec_capacite(2);
    calc_ok(&mut c, "6 * 7");
    assert_eq!(calc_ok(&mut c, "ans + 1"), "43");
    calc_err(&mut c, "ans / 0");
    assert_eq!(calc_ok(&mut c, "ans"), "43");

    let h: Vec<_> = c.history().iter().map(|e| e.expression.as_str()).collect();
    assert_eq!(h, vec!["ans + 1", "ans"]);
}

/* ------------------------ Stress contrôlé ------------------------ */

#[test]
fn sci_stress_profondeur_parentheses() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    let n = 400;
    let expr = format!("{}1{}", "(".repeat(n), ")".repeat(n));
    budget(t0, max);

    let mut c = Calculatrice::new();
    assert_eq!(calc_ok(&mut c, &expr), "1");
    budget(t0, max);
}

#[test]
fn sci_stress_longue_somme() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    let expr = vec!["0.5"; 2000].join(" + ");
    let mut c = Calculatrice::new();
    let r = c.calculate(&expr);
    budget(t0, max);

    assert_eq!(r.formate.as_deref(), Some("1000"));
    assert_eq!(r.operations, 1999);
}

#[test]
fn sci_stress_grands_entiers() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    let mut c = Calculatrice::new();
    c.set_precision_mode("bigint").unwrap();
    let big = "9".repeat(200);
    let f = calc_ok(&mut c, &format!("({big} + 1) // 10 ** 199"));
    budget(t0, max);
    assert_eq!(f, "10");
}
