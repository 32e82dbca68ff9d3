//
//  command.rs
//  Refmap
//
//  Created by hak (tharun)
//

/// Commands whose arguments are usually paths on the target machine,
/// not files in the repository.
pub const PATH_COMMANDS: &[&str] = &[
    // permissions / ownership
    "chmod", "chown", "chgrp",
    // file operations
    "mv", "cp", "rm", "rmdir", "mkdir", "touch", "ln",
    // viewing
    "cat", "head", "tail", "less", "more", "stat",
    // listing
    "ls", "dir", "find",
    // archives
    "tar", "gzip", "gunzip", "zip", "unzip",
    // shells and interpreters
    "source", "exec", "bash", "sh", "zsh",
    "python", "python3", "node", "ruby", "perl",
    "sudo", "su",
];

fn is_path_command(name: &str) -> bool {
    PATH_COMMANDS.contains(&name)
}

/// Does `value` look like `<cmd> <args...>` for a file-affecting command?
///
/// Matches `chmod 600 /srv/app.yaml`, `sudo rm -rf build/` and
/// `/usr/bin/python3 tools/gen.py`. A bare command with no arguments is not
/// a command invocation.
pub fn is_command_with_path_target(value: &str) -> bool {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    let Some(first) = tokens.first() else {
        return false;
    };

    let mut command = first.to_lowercase();
    if (command == "sudo" || command == "su") && tokens.len() > 1 {
        command = tokens[1].to_lowercase();
    }

    if is_path_command(&command) {
        return tokens.len() > 1;
    }

    // Interpreter given by absolute path: /usr/bin/env-style invocations.
    if command.contains('/') {
        let name = command.trim_end_matches('/').rsplit('/').next().unwrap_or("");
        return is_path_command(name) && tokens.len() > 1;
    }

    false
}
