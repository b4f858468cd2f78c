//! 명령/지시어/모드 후보를 검증해 불변 `RootSchema`를 만드는 resolver.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::{debug, info};

use crate::domain::errors::SchemaError;
use crate::domain::mode::{ModeDescriptor, ModeRef};
use crate::domain::schema::{
    CommandDescriptor, CommandSchema, DirectiveDescriptor, DirectiveSchema, OptionSchema,
    RootSchema,
};

/// 후보 정의 목록으로부터 루트 스키마를 해석한다.
pub struct SchemaResolver {
    command_types: Vec<CommandDescriptor>,
    directive_types: Vec<DirectiveDescriptor>,
    mode_types: Vec<ModeDescriptor>,
}

impl SchemaResolver {
    pub fn new(
        command_types: Vec<CommandDescriptor>,
        directive_types: Vec<DirectiveDescriptor>,
        mode_types: Vec<ModeDescriptor>,
    ) -> Self {
        Self {
            command_types,
            directive_types,
            mode_types,
        }
    }

    /// 루트 스키마를 해석한다. 실패 시 부분 스키마는 노출하지 않는다.
    pub fn resolve(&self) -> Result<RootSchema, SchemaError> {
        let modes = self.resolve_modes()?;
        let (commands, default_command) = self.resolve_commands(&modes)?;
        let directives = self.resolve_directives(&modes)?;

        info!(
            commands = commands.len(),
            directives = directives.len(),
            modes = modes.len(),
            has_default = default_command.is_some(),
            "resolved root schema"
        );

        Ok(RootSchema::new(directives, commands, default_command, modes))
    }

    fn resolve_modes(&self) -> Result<Vec<ModeRef>, SchemaError> {
        let mut modes: Vec<ModeRef> = Vec::new();
        for mode in &self.mode_types {
            let name = mode.name.trim();
            if name.is_empty() {
                return Err(SchemaError::InvalidModeType {
                    owner: "mode registration".to_string(),
                    mode: mode.name.clone(),
                });
            }

            let mode_ref = ModeRef::new(name);
            if !modes.contains(&mode_ref) {
                modes.push(mode_ref);
            }
        }
        Ok(modes)
    }

    fn resolve_commands(
        &self,
        modes: &[ModeRef],
    ) -> Result<(HashMap<String, CommandSchema>, Option<CommandSchema>), SchemaError> {
        let mut default_command: Option<CommandSchema> = None;
        let mut commands: HashMap<String, CommandSchema> = HashMap::new();
        // 중복 오류 메시지를 발견 순서로 만들기 위해 이름 있는 명령을 모두 기록한다.
        let mut discovered: Vec<CommandSchema> = Vec::new();
        let mut has_invalid = false;

        for command_type in &self.command_types {
            let command = derive_command(command_type, modes)?;

            if command.is_default {
                if default_command.is_some() {
                    return Err(SchemaError::TooManyDefaultCommands);
                }
                default_command = Some(command);
                continue;
            }

            let Some(name) = command.name.clone() else {
                continue;
            };
            discovered.push(command.clone());
            if commands.contains_key(&name) {
                debug!(command = %name, "deferring command with colliding name");
                has_invalid = true;
            } else {
                commands.insert(name, command);
            }
        }

        if commands.is_empty() && default_command.is_none() {
            return Err(SchemaError::NoCommandsDefined);
        }

        if has_invalid
            && let Some((name, group)) =
                first_duplicate_group(discovered, |c| c.name.clone().unwrap_or_default())
        {
            return Err(SchemaError::DuplicateCommandName {
                name,
                commands: group,
            });
        }

        Ok((commands, default_command))
    }

    fn resolve_directives(
        &self,
        modes: &[ModeRef],
    ) -> Result<HashMap<String, DirectiveSchema>, SchemaError> {
        let mut directives: HashMap<String, DirectiveSchema> = HashMap::new();
        let mut discovered: Vec<DirectiveSchema> = Vec::new();
        let mut has_invalid = false;

        for directive_type in &self.directive_types {
            let directive = derive_directive(directive_type, modes)?;
            discovered.push(directive.clone());

            if directives.contains_key(&directive.name) {
                debug!(directive = %directive.name, "deferring directive with colliding name");
                has_invalid = true;
            } else {
                directives.insert(directive.name.clone(), directive);
            }
        }

        if has_invalid
            && let Some((name, group)) = first_duplicate_group(discovered, |d| d.name.clone())
        {
            return Err(SchemaError::DuplicateDirectiveName {
                name,
                directives: group,
            });
        }

        Ok(directives)
    }
}

/// 발견 순서를 유지한 채 이름으로 묶고, 구성원이 둘 이상인 첫 그룹을 반환한다.
fn first_duplicate_group<T>(items: Vec<T>, key: impl Fn(&T) -> String) -> Option<(String, Vec<T>)> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<T>> = HashMap::new();

    for item in items {
        let name = key(&item);
        if !groups.contains_key(&name) {
            order.push(name.clone());
        }
        groups.entry(name).or_default().push(item);
    }

    order.into_iter().find_map(|name| {
        let group = groups.remove(&name)?;
        (group.len() > 1).then_some((name, group))
    })
}

fn derive_command(
    descriptor: &CommandDescriptor,
    modes: &[ModeRef],
) -> Result<CommandSchema, SchemaError> {
    let is_default = descriptor.is_default();
    let name = if is_default {
        None
    } else {
        descriptor.name.as_deref().map(normalize_command_name)
    };
    let owner = format!("command '{}'", name.as_deref().unwrap_or("<default>"));

    let mut parameters = descriptor.parameters.clone();
    parameters.sort_by_key(|p| p.order);

    Ok(CommandSchema {
        options: derive_options(&descriptor.options, name.as_deref().unwrap_or("<default>"))?,
        supported_modes: resolve_mode_refs(&descriptor.supported_modes, modes, &owner)?,
        excluded_modes: resolve_mode_refs(&descriptor.excluded_modes, modes, &owner)?,
        name,
        description: descriptor.description.clone(),
        parameters,
        is_default,
        exec: descriptor.exec.clone(),
    })
}

fn derive_directive(
    descriptor: &DirectiveDescriptor,
    modes: &[ModeRef],
) -> Result<DirectiveSchema, SchemaError> {
    // 사용자가 대괄호를 포함해 등록해도 같은 이름으로 취급한다.
    let name = descriptor
        .name
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_string();
    let owner = format!("directive '[{name}]'");

    Ok(DirectiveSchema {
        supported_modes: resolve_mode_refs(&descriptor.supported_modes, modes, &owner)?,
        excluded_modes: resolve_mode_refs(&descriptor.excluded_modes, modes, &owner)?,
        name,
        description: descriptor.description.clone(),
        kind: descriptor.kind,
    })
}

/// 연속 공백을 하나로 정규화한다. 대소문자는 구분한다.
fn normalize_command_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn derive_options(options: &[OptionSchema], command: &str) -> Result<Vec<OptionSchema>, SchemaError> {
    let mut names: HashSet<String> = HashSet::new();
    let mut short_names: HashSet<char> = HashSet::new();
    let mut derived = Vec::with_capacity(options.len());

    for option in options {
        let mut option = option.clone();
        // 실수로 대시를 붙여 등록한 경우를 허용한다.
        option.name = option
            .name
            .as_deref()
            .map(|n| n.trim().trim_start_matches('-').to_string())
            .filter(|n| !n.is_empty());

        if let Some(name) = &option.name
            && !names.insert(name.clone())
        {
            return Err(SchemaError::DuplicateOptionName {
                command: command.to_string(),
                option: name.clone(),
            });
        }

        if let Some(short_name) = option.short_name
            && !short_names.insert(short_name)
        {
            return Err(SchemaError::DuplicateOptionShortName {
                command: command.to_string(),
                short_name,
            });
        }

        derived.push(option);
    }

    Ok(derived)
}

fn resolve_mode_refs(
    names: &[String],
    modes: &[ModeRef],
    owner: &str,
) -> Result<BTreeSet<ModeRef>, SchemaError> {
    names
        .iter()
        .map(|name| {
            let mode = ModeRef::new(name.trim());
            if modes.contains(&mode) {
                Ok(mode)
            } else {
                Err(SchemaError::InvalidModeType {
                    owner: owner.to_string(),
                    mode: name.clone(),
                })
            }
        })
        .collect()
}
