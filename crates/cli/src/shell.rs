//! Interactive, menu-driven session over the two panels.
//!
//! The customer panel browses, searches and buys; the admin panel maintains the
//! inventory and shows the sales history. Positions typed by the operator are
//! the `#` values from the most recent table.

use std::io::{BufRead, Write};

use carlot_core::Clock;
use carlot_infra::{InventoryError, InventoryService, RecordStore};
use carlot_inventory::{CarDraft, CarField};

use crate::panel::{self, Panel};

enum Flow {
    Continue,
    Quit,
}

pub struct Shell<'a, S, C, R, W> {
    service: &'a InventoryService<S, C>,
    input: R,
    out: W,
    panel: Panel,
}

impl<'a, S, C, R, W> Shell<'a, S, C, R, W>
where
    S: RecordStore,
    C: Clock,
    R: BufRead,
    W: Write,
{
    pub fn new(service: &'a InventoryService<S, C>, input: R, out: W, panel: Panel) -> Self {
        Self {
            service,
            input,
            out,
            panel,
        }
    }

    /// Run until the operator quits or input ends.
    pub fn run(&mut self) -> anyhow::Result<()> {
        writeln!(self.out, "Welcome to the Car Inventory System")?;
        loop {
            let step = match self.panel {
                Panel::Customer => self.customer_step(),
                Panel::Admin => self.admin_step(),
            };

            match step {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => return Ok(()),
                Err(err) => match err.downcast_ref::<InventoryError>() {
                    Some(e) if e.is_recoverable() => writeln!(self.out, "Notice: {e}")?,
                    Some(e) => {
                        tracing::error!("operation failed: {e}");
                        writeln!(self.out, "Error: {e}")?;
                    }
                    None => return Err(err),
                },
            }
        }
    }

    fn customer_step(&mut self) -> anyhow::Result<Flow> {
        writeln!(self.out)?;
        writeln!(self.out, "[customer] 1) list  2) search  3) buy  4) admin panel  q) quit")?;
        let Some(choice) = self.prompt("> ")? else {
            return Ok(Flow::Quit);
        };

        match choice.as_str() {
            "1" => panel::list(self.service, &mut self.out)?,
            "2" => {
                let Some(criterion) = self.prompt("Search by (Brand/Model/Year/Cost/Shade) [Brand]: ")? else {
                    return Ok(Flow::Quit);
                };
                let criterion = if criterion.is_empty() {
                    CarField::Brand
                } else {
                    criterion.parse::<CarField>().map_err(InventoryError::from)?
                };
                let Some(query) = self.prompt_verbatim("Query (empty to sort): ")? else {
                    return Ok(Flow::Quit);
                };
                panel::search(self.service, &mut self.out, criterion, &query)?;
            }
            "3" => {
                let Some(position) = self.prompt_position()? else {
                    return Ok(Flow::Quit);
                };
                let Some(customer) = self.prompt("Customer name: ")? else {
                    return Ok(Flow::Quit);
                };
                let Some(salesperson) = self.prompt("Salesperson name: ")? else {
                    return Ok(Flow::Quit);
                };
                panel::buy(self.service, &mut self.out, position, &customer, &salesperson)?;
            }
            "4" => self.panel = self.panel.other(),
            "q" => return Ok(Flow::Quit),
            other => writeln!(self.out, "Unknown option '{other}'.")?,
        }
        Ok(Flow::Continue)
    }

    fn admin_step(&mut self) -> anyhow::Result<Flow> {
        writeln!(self.out)?;
        writeln!(
            self.out,
            "[admin] 1) list  2) show  3) add  4) update  5) delete  6) sales  7) customer panel  q) quit"
        )?;
        let Some(choice) = self.prompt("> ")? else {
            return Ok(Flow::Quit);
        };

        match choice.as_str() {
            "1" => panel::list(self.service, &mut self.out)?,
            "2" => {
                let Some(position) = self.prompt_position()? else {
                    return Ok(Flow::Quit);
                };
                panel::show(self.service, &mut self.out, position)?;
            }
            "3" => {
                let Some(draft) = self.prompt_car(&CarDraft::default().with_status("Available"))? else {
                    return Ok(Flow::Quit);
                };
                panel::add(self.service, &mut self.out, draft)?;
            }
            "4" => {
                let Some(position) = self.prompt_position()? else {
                    return Ok(Flow::Quit);
                };
                let current = CarDraft::from(&self.service.car_at(position)?);
                let Some(draft) = self.prompt_car(&current)? else {
                    return Ok(Flow::Quit);
                };
                panel::update(self.service, &mut self.out, position, draft)?;
            }
            "5" => {
                let Some(position) = self.prompt_position()? else {
                    return Ok(Flow::Quit);
                };
                panel::delete(self.service, &mut self.out, position)?;
            }
            "6" => panel::sales(self.service, &mut self.out)?,
            "7" => self.panel = self.panel.other(),
            "q" => return Ok(Flow::Quit),
            other => writeln!(self.out, "Unknown option '{other}'.")?,
        }
        Ok(Flow::Continue)
    }

    /// Ask for each car field; an empty answer keeps the value in brackets.
    fn prompt_car(&mut self, current: &CarDraft) -> anyhow::Result<Option<CarDraft>> {
        let fields = [
            ("Brand", &current.brand),
            ("Model", &current.model),
            ("Year", &current.year),
            ("Cost", &current.cost),
            ("Shade", &current.shade),
            ("Status", &current.status),
        ];

        let mut answers = Vec::with_capacity(fields.len());
        for (label, existing) in fields {
            let Some(answer) = self.prompt(&format!("{label} [{existing}]: "))? else {
                return Ok(None);
            };
            answers.push(if answer.is_empty() { existing.clone() } else { answer });
        }

        let [brand, model, year, cost, shade, status]: [String; 6] = answers
            .try_into()
            .map_err(|_| anyhow::anyhow!("expected six car fields"))?;
        Ok(Some(CarDraft {
            brand,
            model,
            year,
            cost,
            shade,
            status,
        }))
    }

    fn prompt_position(&mut self) -> anyhow::Result<Option<usize>> {
        let Some(raw) = self.prompt("Position (#): ")? else {
            return Ok(None);
        };
        let position = raw
            .parse::<usize>()
            .map_err(|_| InventoryError::Validation(format!("'{raw}' is not a list position")))?;
        Ok(Some(position))
    }

    /// Answer with surrounding whitespace removed; `None` once input is exhausted.
    fn prompt(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        Ok(self.prompt_verbatim(label)?.map(|answer| answer.trim().to_string()))
    }

    /// Answer exactly as typed, minus the line ending.
    fn prompt_verbatim(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        write!(self.out, "{label}")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
