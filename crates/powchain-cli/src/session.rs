//! Line-oriented menu driving a [`Chain`].

use anyhow::Result;
use powchain_core::{Chain, MineControl, Payload};
use std::io::{BufRead, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MenuChoice {
    AddBlock,
    View,
    Validate,
    Tamper,
    Exit,
}

impl MenuChoice {
    fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::AddBlock),
            "2" => Some(Self::View),
            "3" => Some(Self::Validate),
            "4" => Some(Self::Tamper),
            "5" => Some(Self::Exit),
            _ => None,
        }
    }
}

enum Flow {
    Continue,
    Exit,
}

/// Items of a comma separated line, each trimmed.
pub fn parse_transactions(line: &str) -> Payload {
    line.split(',').map(str::trim).collect()
}

pub struct Session<R, W> {
    chain: Chain,
    control: MineControl,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(chain: Chain, control: MineControl, input: R, output: W) -> Self {
        Self {
            chain,
            control,
            input,
            output,
        }
    }

    #[cfg(test)]
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Serve menu commands until the user exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.print_menu()?;
            let Some(line) = self.prompt("Enter your choice: ")? else {
                break;
            };
            let flow = match MenuChoice::parse(&line) {
                Some(MenuChoice::AddBlock) => self.add_block()?,
                Some(MenuChoice::View) => self.view()?,
                Some(MenuChoice::Validate) => self.validate()?,
                Some(MenuChoice::Tamper) => self.tamper()?,
                Some(MenuChoice::Exit) => {
                    writeln!(self.output, "Exiting... Goodbye!")?;
                    Flow::Exit
                }
                None => {
                    writeln!(self.output, "Invalid choice! Please enter a valid option.")?;
                    Flow::Continue
                }
            };
            if let Flow::Exit = flow {
                break;
            }
        }
        self.output.flush()?;
        Ok(())
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "Blockchain Menu:")?;
        writeln!(self.output, "1. Add a New Block")?;
        writeln!(self.output, "2. View Blockchain")?;
        writeln!(self.output, "3. Check Blockchain Validity")?;
        writeln!(self.output, "4. Tamper with a Block")?;
        writeln!(self.output, "5. Exit")?;
        Ok(())
    }

    /// `None` at end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn add_block(&mut self) -> Result<Flow> {
        let Some(line) = self.prompt("Enter transactions (comma separated): ")? else {
            return Ok(Flow::Exit);
        };
        match self
            .chain
            .add_block_with_report(parse_transactions(&line), &self.control)
        {
            Ok((block, report)) => writeln!(
                self.output,
                "Block {} added successfully! nonce={} hash={} attempts={} elapsed={:?}",
                block.index(),
                block.nonce(),
                block.hash(),
                report.attempts,
                report.elapsed
            )?,
            Err(err) => writeln!(self.output, "Block not added: {err}")?,
        }
        Ok(Flow::Continue)
    }

    fn view(&mut self) -> Result<Flow> {
        let snapshot = self.chain.display_blockchain();
        writeln!(self.output, "Blockchain:")?;
        writeln!(self.output, "{}", serde_json::to_string_pretty(&snapshot)?)?;
        Ok(Flow::Continue)
    }

    fn validate(&mut self) -> Result<Flow> {
        match self.chain.validate() {
            Ok(()) => writeln!(self.output, "Blockchain is VALID!")?,
            Err(err) => writeln!(self.output, "Blockchain is INVALID! {err}")?,
        }
        Ok(Flow::Continue)
    }

    fn tamper(&mut self) -> Result<Flow> {
        let Some(index) = self.prompt("Enter Block Index to Tamper: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(replacement) = self.prompt("Enter New Transactions: ")? else {
            return Ok(Flow::Exit);
        };

        let Ok(index) = index.trim().parse::<usize>() else {
            writeln!(
                self.output,
                "Invalid Block Index! '{}' is not a block number.",
                index.trim()
            )?;
            return Ok(Flow::Continue);
        };
        match self.chain.tamper_block(index, Payload::from(replacement)) {
            Ok(()) => writeln!(self.output, "Block {index} has been tampered!")?,
            Err(err) => writeln!(
                self.output,
                "Invalid Block Index! Cannot modify the genesis block or a missing block ({err})."
            )?,
        }
        Ok(Flow::Continue)
    }
}
