use assert_cmd::Command;
use predicates::boolean::PredicateBooleanExt;
use predicates::str::contains;

const BINARY_NAME: &str = "pawnstorm";

#[test]
fn perft_subcommand() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.args(["perft", "3"])
            .assert()
            .success()
            .stdout(contains("nodes 8902")),
    );
}

#[test]
fn perft_divide_subcommand() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.args([
            "perft",
            "1",
            "--divide",
            "--fen",
            "8/8/8/8/8/8/8/k6K w - - 0 1",
        ])
        .assert()
        .success()
        .stdout(contains("h1g2: 1").and(contains("nodes 3"))),
    );
}

#[test]
fn perft_rejects_bad_fen() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.args(["perft", "1", "--fen", "8/8/8 w - -"])
            .assert()
            .failure()
            .stderr(contains("there should be 8 ranks")),
    );
}

#[test]
fn interactive_session() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.write_stdin("position startpos\nmove e2e4\nmove e2e4\nfen\nundo\nperft 2\nquit\n")
            .assert()
            .success()
            .stdout(
                contains("Pawnstorm")
                    .and(contains("illegal move: e2e4"))
                    .and(contains(
                        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
                    ))
                    .and(contains("undone e2e4"))
                    .and(contains("nodes 400")),
            ),
    );
}

#[test]
fn interactive_game_over() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.write_stdin("move f2f3\nmove e7e5\nmove g2g4\nmove d8h4\nmoves\n")
            .assert()
            .success()
            .stdout(contains("game over: checkmate, Black wins")),
    );
}
