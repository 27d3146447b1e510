/// The subset of the Photos Core Data schema the queries touch.
///
/// `ZADDEDDATE` keeps the declared `TIMESTAMP` type of the real store, which
/// gives it NUMERIC affinity: text that does not look like a number stays
/// text, just as it does in a damaged library.
pub const CORE_DATA_SCHEMA: &str = r#"
CREATE TABLE ZASSET (
    Z_PK INTEGER PRIMARY KEY,
    ZADDEDDATE TIMESTAMP
);

CREATE TABLE ZINTERNALRESOURCE (
    Z_PK INTEGER PRIMARY KEY,
    ZASSET INTEGER,
    ZDATALENGTH INTEGER
);

CREATE TABLE ZPERSON (
    Z_PK INTEGER PRIMARY KEY,
    ZDISPLAYNAME VARCHAR,
    ZFACECOUNT INTEGER
);

CREATE TABLE ZDETECTEDFACE (
    Z_PK INTEGER PRIMARY KEY,
    ZPERSONFORFACE INTEGER,
    ZASSETFORFACE INTEGER
);

CREATE INDEX ZINTERNALRESOURCE_ZASSET_INDEX ON ZINTERNALRESOURCE (ZASSET);
CREATE INDEX ZDETECTEDFACE_ZPERSONFORFACE_INDEX ON ZDETECTEDFACE (ZPERSONFORFACE);
"#;
