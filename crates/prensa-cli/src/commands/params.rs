//! Parameter listing command.

use clap::Args;
use prensa_kernel::params::ALL_PARAMS;

#[derive(Args)]
pub struct ParamsArgs {
    /// Show raw addresses for host integration
    #[arg(long)]
    addresses: bool,
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    println!(
        "  {:12}  {:12}  {:>8}  {:>8}  {:>8}",
        "Name", "Identifier", "Min", "Max", "Default"
    );
    println!(
        "  {:12}  {:12}  {:>8}  {:>8}  {:>8}",
        "----", "----------", "---", "---", "-------"
    );

    for address in ALL_PARAMS {
        let spec = address.spec();
        if args.addresses {
            println!(
                "  {:12}  {:12}  {:>8}  {:>8}  {:>8}  (address {})",
                spec.name,
                spec.identifier,
                spec.min,
                spec.max,
                spec.default,
                address.raw()
            );
        } else {
            println!(
                "  {:12}  {:12}  {:>8}  {:>8}  {:>8}",
                spec.name, spec.identifier, spec.min, spec.max, spec.default
            );
        }
    }

    Ok(())
}
