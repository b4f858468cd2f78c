//! 도메인 정책: 모드별 실행 가능 여부 판단(ModeGate).

use std::collections::BTreeSet;

use crate::domain::errors::DispatchError;
use crate::domain::mode::ModeRef;
use crate::domain::schema::SchemaTarget;

/// 현재 모드에서 명령/지시어 실행을 허용할지 결정한다.
#[derive(Debug, Clone, Copy)]
pub struct ModeGate<'a> {
    application_modes: &'a [ModeRef],
}

impl<'a> ModeGate<'a> {
    pub fn new(application_modes: &'a [ModeRef]) -> Self {
        Self { application_modes }
    }

    /// 적용 가능한 모드 집합.
    /// supported가 비어 있으면 애플리케이션 전체 모드, 이후 excluded를 무조건 제외한다.
    pub fn applicable_modes(&self, target: SchemaTarget<'_>) -> BTreeSet<ModeRef> {
        let supported = target.supported_modes();
        let mut modes: BTreeSet<ModeRef> = if supported.is_empty() {
            self.application_modes.iter().cloned().collect()
        } else {
            supported.clone()
        };

        for excluded in target.excluded_modes() {
            modes.remove(excluded);
        }
        modes
    }

    pub fn is_allowed(&self, target: SchemaTarget<'_>, active_mode: &ModeRef) -> bool {
        self.applicable_modes(target).contains(active_mode)
    }

    /// 허용되지 않으면 지원 모드 목록을 담은 오류를 반환한다.
    pub fn check(&self, target: SchemaTarget<'_>, active_mode: &ModeRef) -> Result<(), DispatchError> {
        let modes = self.applicable_modes(target);
        if modes.contains(active_mode) {
            return Ok(());
        }

        Err(DispatchError::ModeRestriction {
            kind: target.kind_label(),
            target: target.display_name(),
            active_mode: active_mode.clone(),
            supported_modes: modes.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::domain::schema::CommandSchema;

    fn command(supported: &[&str], excluded: &[&str]) -> CommandSchema {
        CommandSchema {
            name: Some("book add".to_string()),
            description: None,
            parameters: Vec::new(),
            options: Vec::new(),
            supported_modes: supported.iter().map(|m| ModeRef::from(*m)).collect(),
            excluded_modes: excluded.iter().map(|m| ModeRef::from(*m)).collect(),
            is_default: false,
            exec: None,
        }
    }

    fn all_modes() -> Vec<ModeRef> {
        ["A", "B", "C"].into_iter().map(ModeRef::from).collect()
    }

    #[test]
    fn excluded_mode_wins_over_supported() {
        let modes = all_modes();
        let gate = ModeGate::new(&modes);
        let schema = command(&["A", "B"], &["B"]);

        assert!(!gate.is_allowed(SchemaTarget::Command(&schema), &ModeRef::from("B")));
        assert!(gate.is_allowed(SchemaTarget::Command(&schema), &ModeRef::from("A")));
    }

    #[test]
    fn unrestricted_schema_is_allowed_everywhere() {
        let modes = all_modes();
        let gate = ModeGate::new(&modes);
        let schema = command(&[], &[]);

        for mode in &modes {
            assert!(gate.is_allowed(SchemaTarget::Command(&schema), mode));
        }
    }

    #[test]
    fn excluded_only_subtracts_from_application_modes() {
        let modes = all_modes();
        let gate = ModeGate::new(&modes);
        let schema = command(&[], &["C"]);

        let applicable = gate.applicable_modes(SchemaTarget::Command(&schema));
        let expected: BTreeSet<ModeRef> = ["A", "B"].into_iter().map(ModeRef::from).collect();
        assert_eq!(applicable, expected);
    }

    #[test]
    fn restriction_error_lists_supported_modes() {
        let modes = all_modes();
        let gate = ModeGate::new(&modes);
        let schema = command(&["B", "A"], &[]);

        let err = gate
            .check(SchemaTarget::Command(&schema), &ModeRef::from("C"))
            .unwrap_err();
        match err {
            DispatchError::ModeRestriction {
                supported_modes,
                active_mode,
                ..
            } => {
                assert_eq!(supported_modes, vec![ModeRef::from("A"), ModeRef::from("B")]);
                assert_eq!(active_mode, ModeRef::from("C"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
