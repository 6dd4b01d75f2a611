#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

#[cfg(target_arch = "avr")]
mod firmware;

// Host builds only exercise the library.
#[cfg(not(target_arch = "avr"))]
fn main() {}
