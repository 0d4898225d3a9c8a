use bindery_dialect::{DatabaseVersion, Dialect};

fn version(major: u16, minor: u16) -> DatabaseVersion {
    DatabaseVersion::new(major, minor)
}

#[test]
fn next_value_spellings() {
    assert_eq!(
        Dialect::h2(version(2, 2))
            .sequence_next_value("order_seq")
            .unwrap(),
        "select next value for order_seq"
    );
    assert_eq!(
        Dialect::postgresql(version(16, 0))
            .sequence_next_value("order_seq")
            .unwrap(),
        "select nextval('order_seq')"
    );
    assert_eq!(
        Dialect::oracle(version(19, 0))
            .sequence_next_value("order_seq")
            .unwrap(),
        "select order_seq.nextval from dual"
    );
}

#[test]
fn mysql_has_no_sequences() {
    let dialect = Dialect::mysql(version(8, 0));

    assert!(!dialect.supports_sequences());
    let err = dialect.sequence_next_value("order_seq").unwrap_err();
    assert_eq!(
        err.to_string(),
        "dialect 'mysql': unsupported feature: sequences"
    );
}

#[test]
fn mariadb_gained_sequences_in_ten_three() {
    let old = Dialect::mariadb(version(10, 2));
    assert!(!old.supports_sequences());
    let err = old.sequence_next_value("order_seq").unwrap_err();
    assert_eq!(
        err.to_string(),
        "dialect 'mariadb': unsupported feature: sequences"
    );

    let new = Dialect::mariadb(version(10, 3));
    assert!(new.supports_sequences());
    assert_eq!(
        new.sequence_next_value("order_seq").unwrap(),
        "select next value for order_seq"
    );
}

#[test]
fn sequence_ddl() {
    let dialect = Dialect::postgresql(version(16, 0));

    assert_eq!(
        dialect.sequences.create_ddl("order_seq", 1, 50).unwrap(),
        "create sequence order_seq start with 1 increment by 50"
    );
    assert_eq!(
        dialect.sequences.drop_ddl("order_seq").unwrap(),
        "drop sequence order_seq"
    );

    let err = Dialect::sqlite(version(3, 40))
        .sequences
        .create_ddl("order_seq", 1, 1)
        .unwrap_err();
    assert!(err.is_unsupported_feature());
}
