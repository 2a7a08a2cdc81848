use std::fs;

use pricedb_common::parser::read_price_db;
use pricedb_common::writer::{render, write_price_db};
use pricedb_common::{PriceDbError, parse_price_db};
use tempfile::tempdir;

const LEDGER: &str = "P 2021-12-31 \"TDB900\" $14.52\r\n\
P 2022-01-04 \"TDB900\" $14.60\r\n\
P 2022-02-20 \"WP\" $25.0000\r\n\
P 2022-02-21 \"WP\" $25.4400\r\n\
P 2022-02-21 \"WP\" $25.4400\r\n\
P 2022-02-22 \"XEQ\" CAD-0.10\r\n";

#[test]
fn render_reproduces_well_formed_ledger() {
    let prices = parse_price_db(LEDGER).expect("parse");
    assert_eq!(prices.len(), 6);
    assert_eq!(render(&prices), LEDGER);
}

#[test]
fn lf_only_ledger_is_rewritten_with_crlf() {
    let lf = LEDGER.replace("\r\n", "\n");
    let prices = parse_price_db(&lf).expect("parse");
    assert_eq!(render(&prices), LEDGER);
}

#[test]
fn write_replaces_existing_file() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("prices.txt");
    fs::write(&path, "P 2000-01-01 \"OLD\" $1\r\n").expect("seed");

    let prices = parse_price_db(LEDGER).expect("parse");
    write_price_db(&path, &prices).expect("write");

    assert_eq!(fs::read_to_string(&path).expect("read"), LEDGER);
    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .expect("read_dir")
        .map(|entry| entry.expect("entry").file_name())
        .collect();
    assert_eq!(leftovers, vec![std::ffi::OsString::from("prices.txt")]);
}

#[test]
fn write_creates_missing_file() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("new_prices.txt");
    let prices = parse_price_db("P 2023-08-09 \"WP\" $25.37").expect("parse");

    write_price_db(&path, &prices).expect("write");

    assert_eq!(
        fs::read_to_string(&path).expect("read"),
        "P 2023-08-09 \"WP\" $25.37\r\n"
    );
}

#[test]
fn missing_ledger_is_an_io_error() {
    let temp = tempdir().expect("tempdir");
    let err = read_price_db(&temp.path().join("absent.txt")).unwrap_err();
    assert!(matches!(err, PriceDbError::Io(_)));
}

#[cfg(unix)]
#[test]
fn rewrite_keeps_ledger_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("prices.txt");
    let prices = parse_price_db(LEDGER).expect("parse");

    for mode in [0o644, 0o640, 0o664] {
        fs::write(&path, "P 2000-01-01 \"OLD\" $1\r\n").expect("seed");
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).expect("chmod");

        write_price_db(&path, &prices).expect("write");

        let after = fs::metadata(&path).expect("metadata").permissions().mode() & 0o777;
        assert_eq!(after, mode, "mode {mode:o} became {after:o}");
    }
}

#[cfg(unix)]
#[test]
fn new_ledger_gets_default_mode() {
    use std::os::unix::fs::PermissionsExt;

    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("prices.txt");
    let prices = parse_price_db(LEDGER).expect("parse");

    write_price_db(&path, &prices).expect("write");

    // 0666 masked by the umask: never executable, always owner read/write.
    let mode = fs::metadata(&path).expect("metadata").permissions().mode() & 0o777;
    assert_eq!(mode & 0o600, 0o600);
    assert_eq!(mode & 0o111, 0);
}
