use crate::error::CliError;
use clap::Subcommand;
use kubediag_rules::Rule as _;

#[derive(Subcommand, Debug)]
pub enum RulesCommands {
    /// List every rule in the default registry, in evaluation order.
    List,
    /// Show one rule's metadata by name.
    Show {
        /// Exact rule name (see `rules list`).
        name: String,
    },
}

pub fn run(command: RulesCommands) -> Result<(), CliError> {
    let registry = kubediag_rules::default_registry()?;
    match command {
        RulesCommands::List => {
            for rule in registry.rules() {
                println!(
                    "{:<40} priority={:<5} category={:<14} confidence={:.2}",
                    rule.name(),
                    rule.priority(),
                    rule.category(),
                    rule.rule_confidence()
                );
            }
        }
        RulesCommands::Show { name } => match registry.rules().iter().find(|r| r.name() == name) {
            Some(rule) => {
                println!("name: {}", rule.name());
                println!("category: {}", rule.category());
                println!("priority: {}", rule.priority());
                println!("ruleConfidence: {:.3}", rule.rule_confidence());
                println!("expectedEvidenceCount: {}", rule.expected_evidence_count());
                println!("requires.objects: {:?}", rule.requires().objects);
                println!("requires.optional: {:?}", rule.requires().optional);
                println!("blocks: {:?}", rule.blocks());
            }
            None => println!("no rule named '{name}' in the registry"),
        },
    }
    Ok(())
}
