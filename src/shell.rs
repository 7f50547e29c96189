//! Line-oriented command interpreter over an `AvlSet<i64>`.

use crate::avl_tree::AvlSet;
use crate::error::{Error, Result};
use log::{debug, warn};
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;
use std::time::Instant;

const HELP: &str = "commands: insert K | search K | remove K | asc | desc | height K | level K | \
                    tree-height | balances | len | help | exit";

/// A parsed shell command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    Insert(i64),
    Search(i64),
    Remove(i64),
    Ascending,
    Descending,
    Height(i64),
    Level(i64),
    TreeHeight,
    Balances,
    Len,
    Help,
    Exit,
}

fn parse_key(command: &'static str, argument: Option<&str>) -> Result<i64> {
    let value = argument.ok_or(Error::MissingArgument(command))?;
    value.parse().map_err(|_| Error::InvalidArgument {
        command,
        value: value.to_string(),
    })
}

impl FromStr for Command {
    type Err = Error;

    /// Parses a command such as `insert 5` or `asc`. Surrounding whitespace is ignored.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::shell::Command;
    ///
    /// assert_eq!("insert 5".parse::<Command>().unwrap(), Command::Insert(5));
    /// assert_eq!("  asc ".parse::<Command>().unwrap(), Command::Ascending);
    /// assert!("insert".parse::<Command>().is_err());
    /// ```
    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or("");
        let argument = words.next();

        let command = match name {
            "insert" => Command::Insert(parse_key("insert", argument)?),
            "search" => Command::Search(parse_key("search", argument)?),
            "remove" => Command::Remove(parse_key("remove", argument)?),
            "height" => Command::Height(parse_key("height", argument)?),
            "level" => Command::Level(parse_key("level", argument)?),
            "asc" => Command::Ascending,
            "desc" => Command::Descending,
            "tree-height" => Command::TreeHeight,
            "balances" => Command::Balances,
            "len" => Command::Len,
            "help" => Command::Help,
            "exit" => Command::Exit,
            _ => return Err(Error::UnknownCommand(name.to_string())),
        };
        Ok(command)
    }
}

fn join<I>(items: I) -> String
where
    I: Iterator,
    I::Item: Display,
{
    items.map(|item| item.to_string()).collect::<Vec<String>>().join(" ")
}

/// Executes commands against an owned set.
///
/// # Examples
/// ```
/// use avl_collections::shell::{Command, Shell};
///
/// let mut shell = Shell::new(vec![10, 20, 30].into_iter().collect());
/// assert_eq!(shell.execute(Command::Height(10)), "height of 10: 2");
/// assert_eq!(shell.execute(Command::Descending), "30 20 10");
/// ```
pub struct Shell {
    set: AvlSet<i64>,
}

impl Shell {
    pub fn new(set: AvlSet<i64>) -> Self {
        Shell { set }
    }

    pub fn set(&self) -> &AvlSet<i64> {
        &self.set
    }

    /// Runs a single command and returns the text to show for it.
    pub fn execute(&mut self, command: Command) -> String {
        match command {
            Command::Insert(key) => {
                if self.set.insert(key) {
                    format!("inserted {}", key)
                } else {
                    format!("{} already exists", key)
                }
            },
            Command::Search(key) => {
                let start = Instant::now();
                let found = self.set.search(&key).map(|node| (node.level(), node.balance()));
                debug!("search for {} took {:?}", key, start.elapsed());
                match found {
                    Some((level, balance)) => {
                        format!("found {} at level {} with balance {}", key, level, balance)
                    },
                    None => format!("{} not found", key),
                }
            },
            Command::Remove(key) => match self.set.remove(&key) {
                Some(_) => format!("removed {}", key),
                None => format!("{} not found", key),
            },
            Command::Ascending => join(self.set.iter()),
            Command::Descending => join(self.set.iter_desc()),
            Command::Height(key) => match self.set.height_of_key(&key) {
                0 => format!("{} not found", key),
                height => format!("height of {}: {}", key, height),
            },
            Command::Level(key) => match self.set.level_of_key(&key) {
                Some(level) => format!("level of {}: {}", key, level),
                None => format!("{} not found", key),
            },
            Command::TreeHeight => format!("tree height: {}", self.set.tree_height()),
            Command::Balances => join(self.set.balances()),
            Command::Len => format!("{} keys", self.set.len()),
            Command::Help => HELP.to_string(),
            Command::Exit => String::new(),
        }
    }

    /// Reads commands from `input` until `exit` or end of input, writing one response per
    /// command to `output`. Malformed lines are reported and skipped.
    pub fn run<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(Command::Exit) => break,
                Ok(command) => writeln!(output, "{}", self.execute(command))?,
                Err(error) => {
                    warn!("{}", error);
                    writeln!(output, "error: {}", error)?;
                },
            }
        }
        output.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Command, Shell};
    use crate::avl_tree::AvlSet;
    use crate::error::Error;
    use std::io::Cursor;

    fn shell() -> Shell {
        Shell::new(vec![5, 3, 8, 1, 4, 7, 9].into_iter().collect())
    }

    #[test]
    fn test_parse() {
        assert_eq!("search -4".parse::<Command>().unwrap(), Command::Search(-4));
        assert_eq!("remove 2".parse::<Command>().unwrap(), Command::Remove(2));
        assert_eq!("tree-height".parse::<Command>().unwrap(), Command::TreeHeight);
        assert_eq!("exit".parse::<Command>().unwrap(), Command::Exit);
    }

    #[test]
    fn test_parse_errors() {
        match "fly 3".parse::<Command>() {
            Err(Error::UnknownCommand(name)) => assert_eq!(name, "fly"),
            other => panic!("unexpected result: {:?}", other),
        }
        match "level".parse::<Command>() {
            Err(Error::MissingArgument(command)) => assert_eq!(command, "level"),
            other => panic!("unexpected result: {:?}", other),
        }
        match "height x".parse::<Command>() {
            Err(Error::InvalidArgument { command, value }) => {
                assert_eq!(command, "height");
                assert_eq!(value, "x");
            },
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_execute() {
        let mut shell = shell();
        assert_eq!(shell.execute(Command::Insert(6)), "inserted 6");
        assert_eq!(shell.execute(Command::Insert(6)), "6 already exists");
        assert_eq!(shell.execute(Command::Remove(3)), "removed 3");
        assert_eq!(shell.execute(Command::Remove(3)), "3 not found");
        assert_eq!(shell.execute(Command::Ascending), "1 4 5 6 7 8 9");
        assert_eq!(shell.execute(Command::Descending), "9 8 7 6 5 4 1");
        assert_eq!(shell.execute(Command::Level(5)), "level of 5: 0");
        assert_eq!(shell.execute(Command::Level(2)), "2 not found");
        assert_eq!(shell.execute(Command::Height(2)), "2 not found");
        assert_eq!(shell.execute(Command::Len), "7 keys");
        shell.set().assert_invariants();
    }

    #[test]
    fn test_search() {
        let mut shell = shell();
        assert_eq!(shell.execute(Command::Search(5)), "found 5 at level 0 with balance 0");
        assert_eq!(shell.execute(Command::Search(2)), "2 not found");
    }

    #[test]
    fn test_run() {
        let mut shell = Shell::new(AvlSet::new());
        let input = "insert 10\ninsert 20\n\ninsert 30\nbogus\ntree-height\nasc\nexit\ninsert 40\n";
        let mut output = Vec::new();
        shell.run(Cursor::new(input), &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(
            output.lines().collect::<Vec<&str>>(),
            vec![
                "inserted 10",
                "inserted 20",
                "inserted 30",
                "error: unknown command `bogus`",
                "tree height: 2",
                "10 20 30",
            ],
        );
        assert!(!shell.set().contains(&40));
    }
}
