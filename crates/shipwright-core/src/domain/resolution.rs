//! Alias resolution: registry → complete expected binding set.

use crate::domain::entities::{alias::AliasBinding, registry::Registry};

/// Derive every binding the registry implies.
///
/// Each group contributes its own id as a group shortcut. Each command
/// contributes its canonical name plus every declared extra alias, all
/// pointing at the command entry. The result is sorted by
/// [`AliasBinding::sort_key`] so identical registries give identical output.
pub fn resolve_aliases(registry: &Registry, package: &str) -> Vec<AliasBinding> {
    let mut bindings = Vec::with_capacity(registry.groups().len() + registry.command_count() * 2);

    for group in registry.groups() {
        bindings.push(AliasBinding::for_group(package, group.id()));
        for command in group.commands() {
            bindings.push(AliasBinding::for_command(
                package,
                group.id(),
                command.name(),
                command.name().canonical(),
            ));
            for alias in command.aliases() {
                bindings.push(AliasBinding::for_command(
                    package,
                    group.id(),
                    command.name(),
                    alias.as_str(),
                ));
            }
        }
    }

    bindings.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    tracing::debug!(count = bindings.len(), "resolved alias bindings");
    bindings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::registry::{CommandGroup, CommandSpec},
        value_objects::SourceKind,
    };

    #[test]
    fn single_group_single_command_gives_two_bindings() {
        let registry = Registry::new(vec![
            CommandGroup::new("vessel", "")
                .unwrap()
                .with_command(CommandSpec::new("tour-ship", "").unwrap())
                .unwrap(),
        ])
        .unwrap();

        let bindings = resolve_aliases(&registry, "starship");
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].alias, "vessel");
        assert_eq!(bindings[0].kind, SourceKind::Group);
        assert_eq!(bindings[0].target.to_string(), "starship.commands.vessel:run_group");
        assert_eq!(bindings[1].alias, "tour-ship");
        assert_eq!(
            bindings[1].target.to_string(),
            "starship.commands.vessel.tour_ship.cli:tour_ship_command"
        );
    }

    #[test]
    fn ordering_is_stable_regardless_of_declaration_order() {
        let build = |order: [&str; 2]| {
            let groups = order
                .iter()
                .map(|g| {
                    CommandGroup::new(*g, "")
                        .unwrap()
                        .with_command(
                            CommandSpec::new("zeta", "").unwrap().with_alias("z").unwrap(),
                        )
                        .unwrap()
                        .with_command(CommandSpec::new("alpha", "").unwrap())
                        .unwrap()
                })
                .collect();
            resolve_aliases(&Registry::new(groups).unwrap(), "pkg")
        };

        let a = build(["beta", "alpha"]);
        let b = build(["alpha", "beta"]);
        assert_eq!(a, b);

        let aliases: Vec<_> = a.iter().map(|b| b.alias.as_str()).collect();
        assert_eq!(
            aliases,
            ["alpha", "alpha", "z", "zeta", "beta", "alpha", "z", "zeta"]
        );
    }

    #[test]
    fn extra_aliases_share_the_command_target() {
        let registry = Registry::new(vec![
            CommandGroup::new("probe", "")
                .unwrap()
                .with_command(
                    CommandSpec::new("map_planet", "")
                        .unwrap()
                        .with_alias("map")
                        .unwrap()
                        .with_alias("mp")
                        .unwrap(),
                )
                .unwrap(),
        ])
        .unwrap();

        let bindings = resolve_aliases(&registry, "pkg");
        let targets: Vec<_> = bindings[1..].iter().map(|b| b.target.to_string()).collect();
        assert_eq!(bindings.len(), 4);
        assert!(targets.iter().all(|t| t == &targets[0]));
        assert_eq!(bindings[1].alias, "map");
        assert_eq!(bindings[3].alias, "mp");
    }
}
