//! manifest `exec`의 첫 토큰을 실행 파일 경로로 찾는다.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// 경로 구분자가 있으면 그 파일을, 없으면 `search_path`를 순회해 찾는다.
pub fn locate_program(program: &str, search_path: Option<OsString>) -> Option<PathBuf> {
    let program = program.trim();
    if program.is_empty() {
        return None;
    }

    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let search_path = search_path?;
    env::split_paths(&search_path).find_map(|dir| {
        executable_names(program)
            .into_iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    })
}

/// 현재 프로세스의 PATH로 찾는다.
pub fn locate_in_env(program: &str) -> Option<PathBuf> {
    locate_program(program, env::var_os("PATH"))
}

#[cfg(windows)]
fn executable_names(program: &str) -> Vec<String> {
    if Path::new(program).extension().is_some() {
        return vec![program.to_string()];
    }
    let pathext = env::var_os("PATHEXT").unwrap_or_else(|| ".EXE;.CMD;.BAT;.COM".into());
    let mut names = vec![program.to_string()];
    names.extend(
        pathext
            .to_string_lossy()
            .split(';')
            .map(str::trim)
            .filter(|ext| !ext.is_empty())
            .map(|ext| format!("{program}{ext}")),
    );
    names
}

#[cfg(not(windows))]
fn executable_names(program: &str) -> Vec<String> {
    vec![program.to_string()]
}
