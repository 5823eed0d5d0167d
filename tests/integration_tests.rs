use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use ynabify::OutputRow;

const CHECKING_PREAMBLE: &str = concat!(
    "\"Kontonummer:\";\"DE00 1234 5678\"\n",
    "\"Von:\";\"01.02.2026\"\n",
    "\"Bis:\";\"28.02.2026\"\n",
    "\"Kontostand vom 28.02.2026:\";\"1.234,56 EUR\"\n",
);

const CHECKING_HEADER: &str = "\"Wertstellung\";\"Zahlungspflichtige*r\";\"Zahlungsempfänger*in\";\"Verwendungszweck\";\"Betrag (EUR)\"\n";

const VISA_PREAMBLE: &str = concat!(
    "\"Kreditkarte:\";\"4998 XXXX XXXX 1234\"\n",
    "\n",
    "\"Zeitraum:\";\"Februar 2026\"\n",
    "\"Saldo:\";\"321,00 EUR\"\n",
    "\"Datum:\";\"01.03.2026\"\n",
    "\n",
);

const VISA_HEADER: &str =
    "\"Umsatz abgerechnet\";\"Wertstellung\";\"Beschreibung\";\"Betrag (EUR)\";\"\"\n";

fn write_checking_export(dir: &Path, data_lines: &[&str]) -> PathBuf {
    let mut content = String::from(CHECKING_PREAMBLE);
    content.push_str(CHECKING_HEADER);
    for line in data_lines {
        content.push_str(line);
        content.push('\n');
    }
    let path = dir.join("umsaetze.csv");
    fs::write(&path, content).unwrap();
    path
}

fn write_visa_export(dir: &Path, data_lines: &[&str]) -> PathBuf {
    let mut content = String::from(VISA_PREAMBLE);
    content.push_str(VISA_HEADER);
    for line in data_lines {
        content.push_str(line);
        content.push('\n');
    }
    let path = dir.join("kreditkarte.csv");
    fs::write(&path, content).unwrap();
    path
}

fn read_output_rows(path: &Path) -> Vec<OutputRow> {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    rdr.deserialize().map(|r| r.unwrap()).collect()
}

fn ynabify() -> Command {
    Command::cargo_bin("ynabify").unwrap()
}

#[test]
fn test_that_checking_export_converts_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    // 4 well-formed rows, 1 with an unparseable amount
    let input = write_checking_export(
        dir.path(),
        &[
            "\"19.02.26\";\"\";\"REWE Markt GmbH\";\"Einkauf Lebensmittel\";\"-42,17\"",
            "\"20.02.26\";\"ACME GmbH\";\"\";\"Gehalt   Februar 2026\";\"2.500,00\"",
            "\"21.02.26\";\"\";\"Stadtwerke\";\"Abschlag Strom\";\"defekt\"",
            "\"22.02.26\";\"\";\"PayPal Europe S.a.r.l. et Cie S.C.A\";\"PP.1234.PP Ihr Einkauf bei Bandcamp, Vielen Dank\";\"-9,99\"",
            "\"23.02.2026\";\"\";\"Vermieter\";\"Miete Maerz\";\"-850,00\"",
        ],
    );

    ynabify().arg(&input).arg("giro").assert().success();

    let output = dir.path().join("umsaetze-ynab.csv");
    assert!(output.exists());

    let rows = read_output_rows(&output);
    assert_eq!(rows.len(), 4); // one row dropped for the bad amount

    // Outflow/Inflow are mutually exclusive on every row
    for row in &rows {
        assert!(
            row.outflow.is_empty() || row.inflow.is_empty(),
            "both flows set: {row:?}"
        );
        assert_eq!(row.category, "");
    }

    assert_eq!(rows[0].date, "19/02/26");
    assert_eq!(rows[0].payee, "REWE Markt GmbH");
    assert_eq!(rows[0].outflow, "42.17");

    assert_eq!(rows[1].payee, "ACME GmbH");
    assert_eq!(rows[1].memo, "Gehalt Februar 2026");
    assert_eq!(rows[1].inflow, "2500.00");

    assert_eq!(rows[2].payee, "Bandcamp");

    // Four-digit source year collapses to the same two-digit form
    assert_eq!(rows[3].date, "23/02/26");
}

#[test]
fn test_that_account_type_is_auto_detected() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_visa_export(
        dir.path(),
        &[
            "\"Ja\";\"19.02.26\";\"BANDCAMP\";\"-7,00\";\"Online-Umsatz\"",
            "\"Ja\";\"20.02.26\";\"AUSGLEICH KREDITKARTE\";\"321,00\";\"\"",
        ],
    );

    ynabify().arg(&input).assert().success();

    let rows = read_output_rows(&dir.path().join("kreditkarte-ynab.csv"));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].payee, "BANDCAMP");
    assert_eq!(rows[0].memo, "Online-Umsatz");
    assert_eq!(rows[0].outflow, "7.00");
    assert_eq!(rows[1].inflow, "321.00");
}

#[test]
fn test_that_explicit_output_path_is_honoured() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_checking_export(
        dir.path(),
        &["\"19.02.26\";\"\";\"A\";\"x\";\"-1,00\""],
    );
    let output = dir.path().join("custom.csv");

    ynabify()
        .arg(&input)
        .arg("giro")
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    assert!(output.exists());
    assert_eq!(read_output_rows(&output).len(), 1);
}

#[test]
fn test_that_reruns_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_checking_export(
        dir.path(),
        &[
            "\"19.02.26\";\"\";\"A\";\"x\";\"-1,00\"",
            "\"20.02.26\";\"B\";\"\";\"y\";\"2,00\"",
        ],
    );
    let output = dir.path().join("out.csv");

    ynabify()
        .arg(&input)
        .arg("giro")
        .arg("-o")
        .arg(&output)
        .assert()
        .success();
    let first = fs::read(&output).unwrap();

    ynabify()
        .arg(&input)
        .arg("giro")
        .arg("-o")
        .arg(&output)
        .assert()
        .success();
    let second = fs::read(&output).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_that_dry_run_previews_without_writing_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_checking_export(
        dir.path(),
        &[
            "\"19.02.26\";\"\";\"A\";\"x\";\"-1,00\"",
            "\"20.02.26\";\"\";\"B\";\"y\";\"-2,00\"",
            "\"21.02.26\";\"\";\"C\";\"z\";\"-3,00\"",
        ],
    );

    ynabify()
        .arg(&input)
        .arg("giro")
        .arg("--dry-run")
        .arg("--limit")
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Date,Payee,Category,Memo,Outflow,Inflow",
        ))
        .stdout(predicate::str::contains("19/02/26"))
        .stdout(predicate::str::contains("20/02/26"))
        .stdout(predicate::str::contains("21/02/26").not());

    assert!(!dir.path().join("umsaetze-ynab.csv").exists());
}

#[test]
fn test_that_missing_columns_fail_with_validation_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let mut content = String::from(CHECKING_PREAMBLE);
    content.push_str("\"Wertstellung\";\"Verwendungszweck\";\"Betrag (EUR)\"\n");
    content.push_str("\"19.02.26\";\"x\";\"-1,00\"\n");
    let input = dir.path().join("kaputt.csv");
    fs::write(&input, content).unwrap();

    ynabify()
        .arg(&input)
        .arg("giro")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("missing required columns"))
        .stderr(predicate::str::contains("Zahlungspflichtige*r"));

    assert!(!dir.path().join("kaputt-ynab.csv").exists());
}

#[test]
fn test_that_undetectable_files_fail_with_validation_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("fremd.csv");
    fs::write(&input, "Date,Description,Amount\n01/01/26,Coffee,-3.50\n").unwrap();

    ynabify()
        .arg(&input)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unable to detect account type"));
}

#[test]
fn test_that_a_missing_file_fails_with_io_exit_code() {
    ynabify()
        .arg("/no/such/file.csv")
        .arg("giro")
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_that_both_version_flags_print_the_version() {
    for flag in ["-v", "--version"] {
        ynabify()
            .arg(flag)
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}

#[test]
fn test_that_an_unknown_account_type_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_checking_export(
        dir.path(),
        &["\"19.02.26\";\"\";\"A\";\"x\";\"-1,00\""],
    );

    ynabify()
        .arg(&input)
        .arg("sparbuch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
