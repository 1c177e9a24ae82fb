#[cfg(windows)]
use colored::*;
use lending_clis::aave_borrow;

pub fn main() -> Result<(), aave_borrow::Error> {
    #[cfg(windows)]
    control::set_virtual_terminal(true).unwrap();
    aave_borrow::run()
}
