extern crate lalrpop;

/// this build script is used to generate grammar.rs (parser) from grammar.lalrpop,
/// the generated file is placed in OUT_DIR and included by lalrpop_mod!
fn main() {
    lalrpop::process_root().unwrap();
}
