use liveprices_bot::{
    engine::{QueryParser, Slugifier},
    utils::{
        error::{BotError, QueryParsingError},
        types::{QueryMode, Rarity},
    },
};

#[test]
fn test_direct_player_classification() {
    let parser = QueryParser::new().unwrap();
    let query = parser.parse(Some("25-99 Shohei Ohtani")).unwrap();

    assert_eq!(query.mode, QueryMode::DirectPlayer);
    assert_eq!(query.overall_tag.as_deref(), Some("25-99"));
    assert_eq!(query.player_name.as_deref(), Some("Shohei Ohtani"));
}

#[test]
fn test_direct_player_single_digit_overall() {
    let parser = QueryParser::new().unwrap();
    let query = parser.parse(Some("25-7 Joe Schmo")).unwrap();

    assert_eq!(query.mode, QueryMode::DirectPlayer);
    assert_eq!(query.overall_tag.as_deref(), Some("25-7"));
}

#[test]
fn test_overall_tag_without_player_is_missing_argument() {
    let parser = QueryParser::new().unwrap();

    match parser.parse(Some("25-99")) {
        Err(BotError::QueryParsing(QueryParsingError::MissingPlayerName(tag))) => {
            assert_eq!(tag, "25-99");
        }
        other => panic!("Expected MissingPlayerName, got {:?}", other),
    }
}

#[test]
fn test_rarity_with_player() {
    let parser = QueryParser::new().unwrap();
    let query = parser.parse(Some("silvers Judge")).unwrap();

    assert_eq!(query.mode, QueryMode::FilteredMovers);
    assert_eq!(query.rarities, vec![Rarity::Silvers]);
    assert_eq!(query.player_name.as_deref(), Some("Judge"));
    assert!(query.overall_tag.is_none());
}

#[test]
fn test_rarity_token_is_case_insensitive() {
    let parser = QueryParser::new().unwrap();
    let query = parser.parse(Some("GOLDS Aaron   Judge")).unwrap();

    assert_eq!(query.rarities, vec![Rarity::Golds]);
    assert_eq!(query.player_name.as_deref(), Some("Aaron Judge"));
}

#[test]
fn test_rarity_without_player() {
    let parser = QueryParser::new().unwrap();
    let query = parser.parse(Some("diamonds")).unwrap();

    assert_eq!(query.mode, QueryMode::FilteredMovers);
    assert_eq!(query.rarities, vec![Rarity::Diamonds]);
    assert!(query.player_name.is_none());
}

#[test]
fn test_player_only_searches_every_rarity() {
    let parser = QueryParser::new().unwrap();
    let query = parser.parse(Some("Judge")).unwrap();

    assert_eq!(query.mode, QueryMode::FilteredMovers);
    assert_eq!(
        query.rarities,
        vec![Rarity::Commons, Rarity::Silvers, Rarity::Golds, Rarity::Diamonds]
    );
    assert_eq!(query.player_name.as_deref(), Some("Judge"));
}

#[test]
fn test_tag_lookalike_is_a_player_name() {
    let parser = QueryParser::new().unwrap();
    let query = parser.parse(Some("25-100 Someone")).unwrap();

    assert_eq!(query.mode, QueryMode::FilteredMovers);
    assert_eq!(query.player_name.as_deref(), Some("25-100 Someone"));
}

#[test]
fn test_no_argument_is_top_movers() {
    let parser = QueryParser::new().unwrap();
    let query = parser.parse(None).unwrap();

    assert_eq!(query.mode, QueryMode::TopMovers);
    assert_eq!(query.rarities, vec![Rarity::Commons]);
    assert!(query.player_name.is_none());
    assert!(query.overall_tag.is_none());
}

#[test]
fn test_slug_examples() {
    let slugifier = Slugifier::new().unwrap();
    assert_eq!(slugifier.slugify("Mike Trout"), "mike-trout");
    assert_eq!(slugifier.slugify("  A.J.   Puk  "), "aj-puk");
}

#[test]
fn test_slug_idempotent_over_varied_names() {
    let names = [
        "Shohei Ohtani",
        "Vladimir Guerrero Jr.",
        "  José   Ramírez ",
        "C.J. Abrams",
        "Ke'Bryan Hayes",
        "Ha-Seong Kim",
        "\tTab\tSeparated\t",
        "!!!",
    ];
    let slugifier = Slugifier::new().unwrap();

    for name in names {
        let slug = slugifier.slugify(name);
        assert_eq!(slugifier.slugify(&slug), slug);
        assert!(slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
    }
}
