// src/modules/auth/user_interface.rs
use log::error;
use std::io::{self, BufRead, Write};
use thiserror::Error;

use super::password::check_password;
use super::service::{
    AuthService, LoginOutcome, RecoverOutcome, RegisterOutcome, ResetOutcome, UsernameStatus,
};
use super::store::StoreError;
use super::username::check_username;
use crate::modules::utils::io::Console;
use crate::modules::utils::logging::log_auth_event;

/// Failure that ends the current menu action
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("console error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Store(#[from] StoreError),
}

type ShellResult = Result<(), ShellError>;

/// Function to show the main menu
fn show_main_menu<R: BufRead, W: Write>(console: &mut Console<R, W>) -> io::Result<()> {
    console.say("")?;
    console.say("--- Authentication System ---")?;
    console.say("1. Register")?;
    console.say("2. Login")?;
    console.say("3. Exit")?;
    Ok(())
}

/// Main menu loop. Returns when the user picks Exit or input runs out.
///
/// Store errors are reported and the menu is shown again; console errors
/// other than end of input are returned to the caller.
pub fn run_main_menu<R: BufRead, W: Write>(
    service: &AuthService<'_>,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    loop {
        show_main_menu(console)?;
        let choice = match console.prompt("Enter your choice: ") {
            Ok(choice) => choice,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        };

        let result = match choice.as_str() {
            "1" => handle_registration(service, console),
            "2" => handle_login(service, console),
            "3" => break,
            _ => console.say("Invalid choice.").map_err(ShellError::from),
        };

        match result {
            Ok(()) => {}
            Err(ShellError::Store(e)) => {
                error!("User store operation failed: {}", e);
                console.say(&format!("Error: {}", e))?;
            }
            Err(ShellError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(ShellError::Io(e)) => return Err(e),
        }
    }

    console.say("Exiting application.")?;
    Ok(())
}

/// Interactive registration: retry the username until it is usable, then
/// retry the password until it is accepted
pub fn handle_registration<R: BufRead, W: Write>(
    service: &AuthService<'_>,
    console: &mut Console<R, W>,
) -> ShellResult {
    let username = loop {
        let username = console.prompt("Enter username (email): ")?;
        match service.check_username(&username)? {
            UsernameStatus::Available => break username,
            UsernameStatus::Invalid => {
                let reason = check_username(&username)
                    .err()
                    .map(|e| format!(": {}", e))
                    .unwrap_or_default();
                console.say(&format!("Invalid username format{}.", reason))?;
            }
            UsernameStatus::Taken => console.say("Username already exists in the system.")?,
        }
    };

    loop {
        let password = console.prompt_password("Enter password: ")?;
        match service.register(&username, &password)? {
            RegisterOutcome::Success => {
                log_auth_event("register", &username, true, None);
                console.say("Registration successful!")?;
                return Ok(());
            }
            RegisterOutcome::InvalidPassword => {
                let reason = check_password(&password)
                    .err()
                    .map(|e| format!(": {}", e))
                    .unwrap_or_default();
                console.say(&format!(
                    "Password does not meet security requirements{}.",
                    reason
                ))?;
            }
            // Another session took the name between the two prompts
            RegisterOutcome::DuplicateUsername | RegisterOutcome::InvalidUsername => {
                log_auth_event(
                    "register",
                    &username,
                    false,
                    Some("username no longer available"),
                );
                console.say("Username already exists in the system.")?;
                return Ok(());
            }
        }
    }
}

/// Interactive login; a failed attempt offers registration or recovery
pub fn handle_login<R: BufRead, W: Write>(
    service: &AuthService<'_>,
    console: &mut Console<R, W>,
) -> ShellResult {
    let username = console.prompt("Enter username: ")?;
    let password = console.prompt_password("Enter password: ")?;

    match service.authenticate(&username, &password)? {
        LoginOutcome::Granted => {
            log_auth_event("login", &username, true, None);
            console.say("Login successful, access granted.")?;
            Ok(())
        }
        LoginOutcome::Denied => {
            log_auth_event("login", &username, false, Some("invalid credentials"));
            console.say("Invalid credentials.")?;
            handle_login_options(service, console)
        }
    }
}

fn handle_login_options<R: BufRead, W: Write>(
    service: &AuthService<'_>,
    console: &mut Console<R, W>,
) -> ShellResult {
    console.say("")?;
    console.say("1. Register")?;
    console.say("2. Forgot Password")?;

    match console.prompt("Choose an option (1/2): ")?.as_str() {
        "1" => handle_registration(service, console),
        "2" => handle_forgot_password(service, console),
        _ => Ok(console.say("Invalid choice.")?),
    }
}

/// Interactive password recovery: view the stored password or set a new one
pub fn handle_forgot_password<R: BufRead, W: Write>(
    service: &AuthService<'_>,
    console: &mut Console<R, W>,
) -> ShellResult {
    let username = console.prompt("Enter your registered username: ")?;
    if !service.is_registered(&username)? {
        console.say("Username not found. Please register.")?;
        return Ok(());
    }

    console.say("1. View Password")?;
    console.say("2. Reset Password")?;
    match console.prompt("Choose an option (1/2): ")?.as_str() {
        "1" => match service.recover(&username)? {
            RecoverOutcome::Found(password) => {
                log_auth_event("view_password", &username, true, None);
                console.say(&format!("Your password is: {}", password))?;
            }
            RecoverOutcome::NotFound => console.say("Username not found. Please register.")?,
        },
        "2" => loop {
            let new_password = console.prompt_password("Enter new password: ")?;
            match service.reset_password(&username, &new_password)? {
                ResetOutcome::Success => {
                    log_auth_event("reset_password", &username, true, None);
                    console.say("Password updated successfully.")?;
                    break;
                }
                ResetOutcome::InvalidPassword => {
                    console.say("Password does not meet requirements.")?;
                }
                ResetOutcome::NotFound => {
                    console.say("Username not found. Please register.")?;
                    break;
                }
            }
        },
        _ => console.say("Invalid choice.")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::auth::store::UserStore;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn setup_test_store() -> (UserStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = UserStore::new(temp_dir.path().join("login_data.txt"));
        (store, temp_dir)
    }

    /// Runs the main menu over scripted input and returns everything printed
    fn run_session(store: &UserStore, input: &str) -> String {
        let service = AuthService::new(store);
        let mut console = Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), false);
        run_main_menu(&service, &mut console).unwrap();
        String::from_utf8(console.output().clone()).unwrap()
    }

    #[test]
    fn test_register_with_retries() {
        let (store, _temp_dir) = setup_test_store();
        store.append("taken@mail.com", "Abcde1!").unwrap();

        let output = run_session(
            &store,
            "1\n1abc@mail.com\ntaken@mail.com\nnew@mail.com\nweak\nGood1pass!\n3\n",
        );

        assert!(output.contains("Invalid username format: username must start with a letter."));
        assert!(output.contains("Username already exists in the system."));
        assert!(output.contains("Password does not meet security requirements"));
        assert!(output.contains("Registration successful!"));
        assert!(output.ends_with("Exiting application.\n"));
        assert_eq!(store.load().unwrap()["new@mail.com"], "Good1pass!");
    }

    #[test]
    fn test_answers_are_passed_through_unchanged() {
        let (store, _temp_dir) = setup_test_store();

        // A padded username is rejected; a padded password is kept as typed
        let output = run_session(
            &store,
            "1\n abc@mail.com\nabc@mail.com\n Abcde1! \n2\nabc@mail.com\n Abcde1! \n3\n",
        );

        assert!(output.contains("Invalid username format: username must start with a letter."));
        assert!(output.contains("Registration successful!"));
        assert!(output.contains("Login successful, access granted."));
        assert_eq!(store.load().unwrap()["abc@mail.com"], " Abcde1! ");
    }

    #[test]
    fn test_login_granted() {
        let (store, _temp_dir) = setup_test_store();
        store.append("abc@mail.com", "Abcde1!").unwrap();

        let output = run_session(&store, "2\nabc@mail.com\nAbcde1!\n3\n");
        assert!(output.contains("Login successful, access granted."));
        assert!(!output.contains("Invalid credentials."));
    }

    #[test]
    fn test_failed_login_then_view_password() {
        let (store, _temp_dir) = setup_test_store();
        store.append("abc@mail.com", "Abcde1!").unwrap();

        let output = run_session(&store, "2\nabc@mail.com\nnope\n2\nabc@mail.com\n1\n3\n");
        assert!(output.contains("Invalid credentials."));
        assert!(output.contains("Your password is: Abcde1!"));
    }

    #[test]
    fn test_failed_login_then_reset_password() {
        let (store, _temp_dir) = setup_test_store();
        store.append("abc@mail.com", "Abcde1!").unwrap();
        store.append("other@mail.com", "Other1!").unwrap();

        let output = run_session(
            &store,
            "2\nabc@mail.com\nnope\n2\nabc@mail.com\n2\nshort\nFresh2@pw\n3\n",
        );
        assert!(output.contains("Password does not meet requirements."));
        assert!(output.contains("Password updated successfully."));

        let users = store.load().unwrap();
        assert_eq!(users["abc@mail.com"], "Fresh2@pw");
        assert_eq!(users["other@mail.com"], "Other1!");
    }

    #[test]
    fn test_failed_login_then_register() {
        let (store, _temp_dir) = setup_test_store();

        let output = run_session(&store, "2\nghost@mail.com\nAbcde1!\n1\nghost@mail.com\nAbcde1!\n3\n");
        assert!(output.contains("Invalid credentials."));
        assert!(output.contains("Registration successful!"));
        assert_eq!(store.load().unwrap()["ghost@mail.com"], "Abcde1!");
    }

    #[test]
    fn test_forgot_password_unknown_user() {
        let (store, _temp_dir) = setup_test_store();

        let output = run_session(&store, "2\nghost@mail.com\nx\n2\nghost@mail.com\n3\n");
        assert!(output.contains("Username not found. Please register."));
        assert!(!store.exists());
    }

    #[test]
    fn test_invalid_choices() {
        let (store, _temp_dir) = setup_test_store();
        store.append("abc@mail.com", "Abcde1!").unwrap();

        let output = run_session(&store, "9\n2\nabc@mail.com\nbad\n7\n3\n");
        assert_eq!(output.matches("Invalid choice.").count(), 2);
    }

    #[test]
    fn test_end_of_input_exits_cleanly() {
        let (store, _temp_dir) = setup_test_store();

        // Input stops in the middle of registration
        let output = run_session(&store, "1\nabc@mail.com\n");
        assert!(output.ends_with("Exiting application.\n"));
        assert!(!store.exists());
    }

    #[test]
    fn test_store_errors_are_reported() {
        let (store, _temp_dir) = setup_test_store();
        std::fs::write(store.path(), "not a record\n").unwrap();

        let output = run_session(&store, "2\nabc@mail.com\nAbcde1!\n3\n");
        assert!(output.contains("Error: corrupt record on line 1"));
        assert!(output.ends_with("Exiting application.\n"));
    }
}
