use futoshiki::{
    BudgetExhausted, BudgetKind, Futoshiki, Generator, GridState, OutOfRange, PropagateError,
    Relation, Violation, PROPAGATION_PASS_LIMIT,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Asserts every row and column holds each value of 1..=N exactly once.
fn assert_latin_square(puzzle: &Futoshiki) {
    let size = puzzle.size();
    for line in puzzle.rows().into_iter().chain(puzzle.columns()) {
        let mut values: Vec<u8> = line
            .iter()
            .map(|cell| cell.value().expect("cell without a value"))
            .collect();
        values.sort_unstable();
        assert_eq!(values, (1..=size).collect::<Vec<_>>());
    }
}

fn assert_latin_square_state(state: &GridState, size: u8) {
    for i in 0..size {
        let mut row_values = Vec::new();
        let mut col_values = Vec::new();
        for j in 0..size {
            let row_cell = &state.cells()[(i as usize) * size as usize + j as usize];
            let col_cell = &state.cells()[(j as usize) * size as usize + i as usize];
            row_values.push(row_cell.given.or(row_cell.value).expect("unsolved cell"));
            col_values.push(col_cell.given.or(col_cell.value).expect("unsolved cell"));
        }
        row_values.sort_unstable();
        col_values.sort_unstable();
        assert_eq!(row_values, (1..=size).collect::<Vec<_>>());
        assert_eq!(col_values, (1..=size).collect::<Vec<_>>());
    }
}

#[test]
fn relation_symmetry() {
    let mut puzzle = Futoshiki::new(4);
    puzzle.add_constraint((0, 0), (1, 0)).unwrap();
    puzzle.add_constraint((2, 1), (2, 2)).unwrap();

    assert_eq!(puzzle.relation_of((0, 0), (1, 0)), Ok(Relation::Less));
    assert_eq!(puzzle.relation_of((1, 0), (0, 0)), Ok(Relation::Greater));
    assert_eq!(puzzle.relation_of((2, 1), (2, 2)), Ok(Relation::Less));
    assert_eq!(puzzle.relation_of((2, 2), (2, 1)), Ok(Relation::Greater));
    assert_eq!(puzzle.relation_of((0, 0), (2, 2)), Ok(Relation::None));
}

#[test]
fn coordinate_misuse() {
    let mut puzzle = Futoshiki::new(4);
    assert!(matches!(
        puzzle.set_given(0, 4, 1),
        Err(OutOfRange::Coord { .. })
    ));
    assert!(matches!(
        puzzle.set_value(1, 1, 7),
        Err(OutOfRange::Value { .. })
    ));
    assert!(matches!(
        puzzle.add_constraint((0, 0), (3, 3)),
        Err(OutOfRange::NotAdjacent { .. })
    ));
    assert!(matches!(
        puzzle.relation_of((0, 0), (0, 9)),
        Err(OutOfRange::Coord { .. })
    ));
    // a failed call leaves the grid untouched
    assert_eq!(puzzle.state(), Futoshiki::new(4).state());
}

#[test]
fn snapshot_idempotence() {
    let mut puzzle = Futoshiki::new(4);
    puzzle
        .set_givens(&[(0, 0, 3), (2, 0, 1), (1, 2, 4)])
        .unwrap();
    puzzle.add_constraint((2, 1), (3, 1)).unwrap();
    puzzle.set_value(3, 0, 2).unwrap();

    let before = puzzle.state();
    puzzle.save("checkpoint");
    assert!(puzzle.restore("checkpoint"));
    assert_eq!(puzzle.state(), before);
}

#[test]
fn restore_unknown_snapshot() {
    let mut puzzle = Futoshiki::new(4);
    assert!(!puzzle.restore("never saved"));
}

#[test]
fn contradiction_before_any_guess() {
    let mut puzzle = Futoshiki::new(4);
    puzzle.set_given(0, 0, 3).unwrap();
    puzzle.set_given(1, 0, 3).unwrap();

    match puzzle.propagate(PROPAGATION_PASS_LIMIT) {
        Err(PropagateError::Contradiction(contradiction)) => {
            assert!(contradiction
                .violations
                .contains(&Violation::DuplicateInRow(0)));
        }
        other => panic!("expected a contradiction, got {:?}", other),
    }

    // the same puzzle fails to solve, without crashing
    let result = puzzle.solve(PROPAGATION_PASS_LIMIT).unwrap();
    assert!(!result.solved);
}

#[test]
fn solve_four_givens() {
    let mut puzzle = Futoshiki::new(4);
    puzzle
        .set_givens(&[(0, 0, 3), (2, 0, 1), (1, 2, 4), (3, 3, 3)])
        .unwrap();

    let result = puzzle.solve(100).unwrap();
    assert!(result.solved);
    assert!(result.iterations <= 100);
    assert!(puzzle.is_solved());
    assert_latin_square(&puzzle);

    // givens are preserved by solving
    assert_eq!(puzzle.grid().cell(0, 0).unwrap().value(), Some(3));
    assert_eq!(puzzle.grid().cell(2, 0).unwrap().value(), Some(1));
    assert_eq!(puzzle.grid().cell(1, 2).unwrap().value(), Some(4));
    assert_eq!(puzzle.grid().cell(3, 3).unwrap().value(), Some(3));
}

#[test]
fn solve_constraints_only() {
    // no givens at all; the inequalities alone pin the grid down
    let mut puzzle = Futoshiki::new(4);
    puzzle
        .add_constraints(&[
            ((2, 0), (3, 0)),
            ((1, 1), (1, 0)),
            ((2, 1), (2, 0)),
            ((2, 2), (1, 2)),
            ((3, 2), (3, 3)),
        ])
        .unwrap();

    let result = puzzle.solve(PROPAGATION_PASS_LIMIT).unwrap();
    assert!(result.solved);
    assert!(puzzle.is_solved());
    assert_latin_square(&puzzle);
}

#[test]
fn solve_records_steps() {
    let mut puzzle = Futoshiki::new(4);
    puzzle.set_givens(&[(0, 0, 3), (2, 0, 1)]).unwrap();
    puzzle.solve(PROPAGATION_PASS_LIMIT).unwrap();
    // initial capture plus at least one per rule application
    assert!(puzzle.solve_steps().len() > 1);
}

#[test]
fn bounded_termination() {
    let mut puzzle = Futoshiki::new(4);
    puzzle
        .set_givens(&[(0, 0, 3), (2, 0, 1), (1, 2, 4), (3, 3, 3)])
        .unwrap();

    match puzzle.solve(1) {
        Err(exhausted) => assert_eq!(exhausted.kind, BudgetKind::PropagationPasses),
        Ok(result) => panic!("expected budget exhaustion, got {:?}", result),
    }
}

#[test]
fn uniqueness_gate() {
    // complete Latin square with an interchangeable value rectangle:
    // cells (0,0), (1,0), (0,2), (1,2) hold 3/4 and 4/3 and can be
    // swapped without breaking any row or column
    let full = [
        [3, 4, 1, 2],
        [1, 2, 3, 4],
        [4, 3, 2, 1],
        [2, 1, 4, 3],
    ];
    let mut puzzle = Futoshiki::new(4);
    for (row, values) in full.iter().enumerate() {
        for (col, &value) in values.iter().enumerate() {
            let hole = (row == 0 || row == 2) && col < 2;
            if !hole {
                puzzle.set_given(col as u8, row as u8, value).unwrap();
            }
        }
    }

    assert!(puzzle.count_solutions(2).unwrap() >= 2);
}

#[test]
fn unique_puzzle_counts_one() {
    let mut puzzle = Futoshiki::new(4);
    let full = [
        [3, 4, 1, 2],
        [1, 2, 3, 4],
        [4, 3, 2, 1],
        [2, 1, 4, 3],
    ];
    for (row, values) in full.iter().enumerate() {
        for (col, &value) in values.iter().enumerate() {
            // one hole only; the rest of the line forces it
            if (row, col) != (0, 0) {
                puzzle.set_given(col as u8, row as u8, value).unwrap();
            }
        }
    }
    assert_eq!(puzzle.count_solutions(2).unwrap(), 1);
}

#[test]
fn contradictory_puzzle_counts_zero() {
    let mut puzzle = Futoshiki::new(4);
    puzzle.set_givens(&[(0, 0, 3), (1, 0, 3)]).unwrap();
    assert_eq!(puzzle.count_solutions(2).unwrap(), 0);
}

#[test]
fn is_solvable_restores_state() {
    let mut puzzle = Futoshiki::new(4);
    puzzle
        .set_givens(&[(0, 0, 3), (2, 0, 1), (1, 2, 4), (3, 3, 3)])
        .unwrap();
    puzzle.save("fallback");
    let before = puzzle.state();

    assert!(puzzle.is_solvable("fallback").unwrap());
    // solvable: the pre-check state comes back, not the solution
    assert_eq!(puzzle.state(), before);

    // an unsolvable puzzle restores the fallback snapshot instead
    let mut broken = Futoshiki::new(4);
    broken.set_givens(&[(0, 0, 3), (2, 0, 1)]).unwrap();
    broken.save("fallback");
    let fallback_state = broken.state();
    broken.set_given(1, 0, 3).unwrap();
    assert!(!broken.is_solvable("fallback").unwrap());
    assert_eq!(broken.state(), fallback_state);
}

#[test]
fn solve_reproduces_fill() {
    let mut puzzle = Futoshiki::new(5);
    let mut generator = Generator::new(&mut puzzle, StdRng::seed_from_u64(11));
    generator.fill().unwrap();
    generator.derive_constraints();

    let filled = puzzle.state();
    let result = puzzle.solve(PROPAGATION_PASS_LIMIT).unwrap();
    assert!(result.solved);
    assert_latin_square(&puzzle);
    for (cell, state) in puzzle.cells().iter().zip(filled.cells()) {
        assert_eq!(cell.value(), state.given.or(state.value));
    }
}

#[test]
fn generated_solutions_are_latin_squares() {
    for seed in 0..5 {
        let mut puzzle = Futoshiki::new(4);
        let generated = puzzle
            .generate_with(StdRng::seed_from_u64(seed), 100)
            .unwrap();
        let solution = puzzle.snapshot(&generated.solution).unwrap();
        assert_latin_square_state(solution, 4);
    }
}

#[test]
fn generated_solution_satisfies_derived_relations() {
    let mut puzzle = Futoshiki::new(4);
    let generated = puzzle
        .generate_with(StdRng::seed_from_u64(3), 100)
        .unwrap();
    let solution = puzzle.snapshot(&generated.solution).unwrap();
    for cell in solution.cells() {
        let value = cell.given.expect("solution cell without given");
        for partner in &cell.less_than {
            let other = solution.cells()[partner.index()]
                .given
                .expect("solution cell without given");
            assert!(value < other);
        }
    }
}

#[test]
fn generated_puzzle_is_solvable() {
    let mut puzzle = Futoshiki::new(4);
    let generated = puzzle
        .generate_with(StdRng::seed_from_u64(42), 100)
        .unwrap();
    // the optimized puzzle is left active on the grid
    assert!(puzzle.snapshot(&generated.initial).is_some());
    assert!(puzzle.snapshot(&generated.optimized).is_some());

    let result = puzzle.solve(PROPAGATION_PASS_LIMIT).unwrap();
    assert!(result.solved);
    assert_latin_square(&puzzle);
}

#[test]
fn generation_is_reproducible() {
    let mut first = Futoshiki::new(4);
    let mut second = Futoshiki::new(4);
    first
        .generate_with(StdRng::seed_from_u64(99), 100)
        .unwrap();
    second
        .generate_with(StdRng::seed_from_u64(99), 100)
        .unwrap();
    assert_eq!(first.state(), second.state());
}

#[test]
fn optimization_budget_is_bounded() {
    let mut puzzle = Futoshiki::new(4);
    let err = puzzle
        .generate_with(StdRng::seed_from_u64(1), 1_000)
        .unwrap_err();
    assert_eq!(
        err,
        BudgetExhausted {
            kind: BudgetKind::OptimizeIterations
        }
    );
}
