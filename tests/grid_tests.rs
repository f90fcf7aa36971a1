use battlegrid::{is_valid_grid, Cell, Grid, GridError, GridKind, MoveOutcome, Position};

#[test]
fn test_empty_grid_is_valid_for_both_kinds() {
    let rows = [[Cell::Empty; 5]; 5];
    assert!(is_valid_grid(&rows, GridKind::Marks));
    assert!(is_valid_grid(&rows, GridKind::Boats));
}

#[test]
fn test_ragged_rows_are_invalid() {
    let mut rows = vec![vec![Cell::Empty; 5]; 5];
    rows[4].pop();
    assert!(!is_valid_grid(&rows, GridKind::Marks));
    assert_eq!(
        Grid::from_rows(&rows),
        Err(GridError::WrongRowLength { row: 4, len: 4 })
    );

    let six = vec![vec![Cell::Empty; 5]; 6];
    assert!(!is_valid_grid(&six, GridKind::Marks));
}

#[test]
fn test_mixed_marks_and_boats_are_invalid() {
    let mut rows = [[Cell::Empty; 5]; 5];
    rows[0][0] = Cell::PlayerX;
    rows[4][4] = Cell::Boat;
    assert!(!is_valid_grid(&rows, GridKind::Marks));
    assert!(!is_valid_grid(&rows, GridKind::Boats));
}

#[test]
fn test_grid_json_uses_null_for_empty() {
    let grid = Grid::empty()
        .with(Position::new(0, 1).unwrap(), Cell::PlayerX)
        .with(Position::new(4, 4).unwrap(), Cell::PlayerO);
    let json = serde_json::to_value(grid).unwrap();
    assert_eq!(json[0][0], serde_json::Value::Null);
    assert_eq!(json[0][1], "x");
    assert_eq!(json[4][4], "o");
    assert_eq!(json.as_array().unwrap().len(), 5);

    let back: Grid = serde_json::from_value(json).unwrap();
    assert_eq!(back, grid);
}

#[test]
fn test_grid_json_rejects_bad_shape_and_symbols() {
    let short = serde_json::json!([[null, null, null, null, null]]);
    assert!(serde_json::from_value::<Grid>(short).is_err());

    let mut rows = vec![vec![serde_json::Value::Null; 5]; 5];
    rows[2][2] = serde_json::json!("z");
    assert!(serde_json::from_value::<Grid>(serde_json::json!(rows)).is_err());
}

#[test]
fn test_grid_survives_bincode() {
    let grid = Grid::empty().with(Position::new(3, 2).unwrap(), Cell::PlayerO);
    let bytes = bincode::serialize(&grid).unwrap();
    let decoded: Grid = bincode::deserialize(&bytes).unwrap();
    assert_eq!(decoded, grid);
}

#[test]
fn test_position_json_is_bounds_checked() {
    let p: Position = serde_json::from_str(r#"{"row":2,"col":3}"#).unwrap();
    assert_eq!(p, Position::new(2, 3).unwrap());

    assert!(serde_json::from_str::<Position>(r#"{"row":9,"col":0}"#).is_err());
    assert!(serde_json::from_str::<Position>(r#"{"row":0,"col":5}"#).is_err());

    let outcome = r#"{"position":{"row":9,"col":9},"hit":false,"winner":null,"finished":false}"#;
    assert!(serde_json::from_str::<MoveOutcome>(outcome).is_err());
}

#[test]
fn test_position_bincode_is_bounds_checked() {
    let mut bytes = bincode::serialize(&Position::new(1, 4).unwrap()).unwrap();
    let decoded: Position = bincode::deserialize(&bytes).unwrap();
    assert_eq!(decoded, Position::new(1, 4).unwrap());

    bytes[0] = 9;
    assert!(bincode::deserialize::<Position>(&bytes).is_err());
}
