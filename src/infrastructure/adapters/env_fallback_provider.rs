//! 옵션 기본값을 프로세스 환경 변수에서 읽는다.

use std::env;

use crate::application::ports::OptionFallbackProvider;

/// `fallback_variable`을 환경 변수 이름으로 해석한다. 빈 값은 없는 것으로 본다.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvironmentFallbackProvider;

impl OptionFallbackProvider for EnvironmentFallbackProvider {
    fn lookup(&self, variable: &str) -> Option<String> {
        env::var(variable).ok().filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_variables_from_the_process_environment() {
        let provider = EnvironmentFallbackProvider;
        assert_eq!(provider.lookup("PATH"), env::var("PATH").ok().filter(|v| !v.is_empty()));
        assert_eq!(provider.lookup("MODESHELL_UNSET_OPTION_VARIABLE"), None);
    }
}
