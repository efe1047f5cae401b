//! Integration tests for CSV roster import.

use tournament_pairing_engine::{
    parse_roster, read_roster, EngineConfig, Format, RosterError, TournamentEngine,
    TournamentOptions,
};

#[test]
fn reads_every_column() {
    let csv = "name,rating,archetype,invited\nAlice,1800,Aggro,yes\nBob,,Control,\nCara,1500,,false\n";
    let roster = parse_roster(csv).unwrap();
    assert_eq!(roster.len(), 3);

    assert_eq!(roster[0].name, "Alice");
    assert_eq!(roster[0].rating, Some(1800.0));
    assert_eq!(roster[0].archetype.as_deref(), Some("Aggro"));
    assert!(roster[0].invited);

    assert_eq!(roster[1].rating, None);
    assert_eq!(roster[1].archetype.as_deref(), Some("Control"));
    assert!(!roster[1].invited);

    assert_eq!(roster[2].archetype, None);
    assert!(!roster[2].invited);
}

#[test]
fn optional_columns_may_be_missing() {
    let roster = read_roster("name\nDan\nEve\n".as_bytes()).unwrap();
    let names: Vec<&str> = roster.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Dan", "Eve"]);
    assert!(roster.iter().all(|c| c.rating.is_none()));
}

#[test]
fn aggression_column_sets_playstyle() {
    let roster = parse_roster("name,aggression\nFinn,1.7\n").unwrap();
    assert_eq!(roster[0].playstyle.map(|p| p.aggression), Some(1.0));
}

#[test]
fn empty_name_reports_its_line() {
    let err = parse_roster("name,rating\nGus,1400\n ,1500\n").unwrap_err();
    assert!(matches!(err, RosterError::MissingName { line: 3 }));
}

#[test]
fn unparsable_rating_is_a_csv_error() {
    let err = parse_roster("name,rating\nHal,strong\n").unwrap_err();
    assert!(matches!(err, RosterError::Csv(_)));
}

#[test]
fn imported_roster_feeds_a_tournament() {
    let roster = parse_roster("name,rating\nIvy,1600\nJon,1550\nKim,1500\nLeo,1450\n").unwrap();
    let mut engine = TournamentEngine::with_seed(EngineConfig::default(), 9);
    let t = engine
        .create_tournament(TournamentOptions::new("Imported", Format::Swiss).with_competitors(roster))
        .unwrap();
    assert_eq!(t.competitors.len(), 4);
}
