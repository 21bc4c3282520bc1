use index_to_docx::{convert, ConvertOptions, Error, InputError};
use std::io::Read;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HEADER: &str = "TOPIC,BK#,PG#,COMMENTS\n";

fn setup(csv: &str) -> (TempDir, ConvertOptions) {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("index.csv");
    std::fs::write(&input, csv).unwrap();
    let mut opts = ConvertOptions::new(input);
    opts.out_dir = dir.path().to_path_buf();
    (dir, opts)
}

fn read_part(docx: &Path, name: &str) -> String {
    let f = std::fs::File::open(docx).unwrap();
    let mut archive = zip::ZipArchive::new(f).unwrap();
    let mut part = archive.by_name(name).unwrap();
    let mut out = String::new();
    part.read_to_string(&mut out).unwrap();
    out
}

/// Paragraphs carrying a topic run.
fn entries(document: &str) -> Vec<&str> {
    document
        .split("<w:p>")
        .filter(|p| p.contains("<w:color w:val=\"1667FF\"/>"))
        .collect()
}

#[test]
fn every_row_becomes_one_entry() {
    let csv = format!("{HEADER}dns,1,7,zone transfer\narp,1,3,spoofing\n3DES,2,10,\nbgp,2,4,hijack\nArp,1,3,cache\n");
    let (_dir, opts) = setup(&csv);
    let out = convert(&opts).unwrap();
    assert_eq!(out, opts.out_dir.join("index.docx"));

    let document = read_part(&out, "word/document.xml");
    assert_eq!(entries(&document).len(), 5);
}

#[test]
fn fields_stay_together_in_one_entry() {
    let csv = format!("{HEADER}\"Networking\",\"B1\",\"42\",\"covers OSI model\"\n");
    let (_dir, opts) = setup(&csv);
    let document = read_part(&convert(&opts).unwrap(), "word/document.xml");

    let found = entries(&document);
    assert_eq!(found.len(), 1);
    let entry = found[0];
    let topic = entry.find(">Networking<").unwrap();
    let reference = entry.find("> [bB1/p42] <").unwrap();
    let comment = entry.find(">covers OSI model<").unwrap();
    assert!(topic < reference && reference < comment);
}

#[test]
fn sorted_by_default_and_grouped_by_letter() {
    let csv = format!("{HEADER}zeta,1,1,z\nalpha,1,1,a\n#hash,1,1,h\nBeta,1,1,b\n");
    let (_dir, opts) = setup(&csv);
    let document = read_part(&convert(&opts).unwrap(), "word/document.xml");

    let order: Vec<usize> = [">#hash<", ">alpha<", ">Beta<", ">zeta<"]
        .iter()
        .map(|t| document.find(t).unwrap())
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]));
    for heading in [">#<", ">Aa<", ">Bb<", ">Zz<"] {
        assert!(document.contains(heading), "missing heading {heading}");
    }
}

#[test]
fn keep_order_preserves_input_order() {
    let csv = format!("{HEADER}zeta,1,1,z\nalpha,1,1,a\n");
    let (_dir, mut opts) = setup(&csv);
    opts.keep_order = true;
    let document = read_part(&convert(&opts).unwrap(), "word/document.xml");
    assert!(document.find(">zeta<").unwrap() < document.find(">alpha<").unwrap());
}

#[test]
fn rerun_is_byte_identical() {
    let csv = format!("{HEADER}dns,1,7,zone transfer\narp,1,3,\"spoofing, poisoning\"\n");
    let (_dir, mut opts) = setup(&csv);
    let first = std::fs::read(convert(&opts).unwrap()).unwrap();
    opts.overwrite = true;
    let second = std::fs::read(convert(&opts).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn header_only_gives_valid_empty_document() {
    let (_dir, opts) = setup(HEADER);
    let out = convert(&opts).unwrap();

    let document = read_part(&out, "word/document.xml");
    assert!(entries(&document).is_empty());
    assert!(document.contains("<w:body>"));
    assert!(document.contains("<w:sectPr>"));
    assert!(read_part(&out, "word/styles.xml").contains("w:styleId=\"Title\""));
    assert!(read_part(&out, "[Content_Types].xml").contains("/word/footer1.xml"));
}

#[test]
fn short_row_fails_and_writes_nothing() {
    let csv = format!("{HEADER}dns,1,7,zone transfer\narp,1\n");
    let (dir, opts) = setup(&csv);
    let err = convert(&opts).unwrap_err();
    assert!(matches!(
        err,
        Error::Input(InputError::FieldCount { line: 3, found: 2, .. })
    ));
    assert!(!dir.path().join("index.docx").exists());
}

#[test]
fn missing_input_fails_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut opts = ConvertOptions::new(dir.path().join("absent.csv"));
    opts.out_dir = dir.path().to_path_buf();

    let err = convert(&opts).unwrap_err();
    assert!(matches!(err, Error::Input(InputError::Read { .. })));
    assert!(!dir.path().join("absent.docx").exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn does_not_overwrite_without_force() {
    let (dir, mut opts) = setup(&format!("{HEADER}dns,1,7,x\n"));
    let existing: PathBuf = dir.path().join("index.docx");
    std::fs::write(&existing, b"not a docx").unwrap();

    assert!(matches!(convert(&opts).unwrap_err(), Error::Output(_)));
    assert_eq!(std::fs::read(&existing).unwrap(), b"not a docx");

    opts.overwrite = true;
    convert(&opts).unwrap();
    assert!(read_part(&existing, "word/document.xml").contains(">dns<"));
}

#[test]
fn unwritable_destination_is_output_error() {
    let (dir, mut opts) = setup(&format!("{HEADER}dns,1,7,x\n"));
    opts.out_dir = dir.path().join("no").join("such").join("dir");
    let err = convert(&opts).unwrap_err();
    assert!(matches!(err, Error::Output(_)));
}
