//! Customer and admin panel actions.
//!
//! Each action calls the inventory service once and renders the outcome.
//! Service failures are returned as [`InventoryError`] inside `anyhow::Error`;
//! callers decide whether to show them as a notice or abort.

use std::io::Write;

use clap::ValueEnum;

use carlot_core::Clock;
use carlot_infra::{InventoryService, RecordStore};
use carlot_inventory::{CarDraft, CarField, CarStatus};

use crate::args::{AdminCommand, CustomerCommand};
use crate::render;

/// Which side of the counter the operator is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Panel {
    Customer,
    Admin,
}

impl Panel {
    pub fn other(self) -> Self {
        match self {
            Panel::Customer => Panel::Admin,
            Panel::Admin => Panel::Customer,
        }
    }
}

pub fn run_customer<S, C, W>(
    service: &InventoryService<S, C>,
    command: CustomerCommand,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: RecordStore,
    C: Clock,
    W: Write,
{
    match command {
        CustomerCommand::List => list(service, out),
        CustomerCommand::Search { criterion, query } => search(service, out, criterion, &query),
        CustomerCommand::Buy {
            position,
            customer,
            salesperson,
        } => buy(service, out, position, &customer, &salesperson),
    }
}

pub fn run_admin<S, C, W>(
    service: &InventoryService<S, C>,
    command: AdminCommand,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: RecordStore,
    C: Clock,
    W: Write,
{
    match command {
        AdminCommand::List => list(service, out),
        AdminCommand::Show { position } => show(service, out, position),
        AdminCommand::Add(car) => add(service, out, car.into_draft(CarStatus::Available.as_str())),
        AdminCommand::Update { position, car } => {
            let draft = match car.status {
                Some(_) => car.into_draft(CarStatus::Available.as_str()),
                None => {
                    let current = service.car_at(position)?;
                    car.into_draft(current.status.as_str())
                }
            };
            update(service, out, position, draft)
        }
        AdminCommand::Delete { position } => delete(service, out, position),
        AdminCommand::Sales => sales(service, out),
    }
}

pub fn list<S: RecordStore, C: Clock, W: Write>(
    service: &InventoryService<S, C>,
    out: &mut W,
) -> anyhow::Result<()> {
    let rows: Vec<_> = service.cars()?.into_iter().enumerate().collect();
    render::cars_table(out, &rows)?;
    Ok(())
}

pub fn search<S: RecordStore, C: Clock, W: Write>(
    service: &InventoryService<S, C>,
    out: &mut W,
    criterion: CarField,
    query: &str,
) -> anyhow::Result<()> {
    let rows = service.listing(criterion, query)?;
    if rows.is_empty() {
        writeln!(out, "No matching cars found for {criterion}.")?;
        return Ok(());
    }
    render::cars_table(out, &rows)?;
    Ok(())
}

pub fn buy<S: RecordStore, C: Clock, W: Write>(
    service: &InventoryService<S, C>,
    out: &mut W,
    position: usize,
    customer: &str,
    salesperson: &str,
) -> anyhow::Result<()> {
    let sale = service.purchase(position, customer, salesperson)?;
    writeln!(
        out,
        "Car purchased successfully. Sale {} recorded: {} for {} (salesperson {}).",
        sale.sale_id, sale.brand, sale.price_sold, sale.salesperson
    )?;
    Ok(())
}

pub fn show<S: RecordStore, C: Clock, W: Write>(
    service: &InventoryService<S, C>,
    out: &mut W,
    position: usize,
) -> anyhow::Result<()> {
    let car = service.car_at(position)?;
    render::car_detail(out, position, &car)?;
    Ok(())
}

pub fn add<S: RecordStore, C: Clock, W: Write>(
    service: &InventoryService<S, C>,
    out: &mut W,
    draft: CarDraft,
) -> anyhow::Result<()> {
    let car = service.add_car(draft)?;
    writeln!(out, "Car added successfully: {} {}.", car.brand, car.model)?;
    Ok(())
}

pub fn update<S: RecordStore, C: Clock, W: Write>(
    service: &InventoryService<S, C>,
    out: &mut W,
    position: usize,
    draft: CarDraft,
) -> anyhow::Result<()> {
    let car = service.update_car(position, draft)?;
    writeln!(out, "Car details updated successfully: {} {}.", car.brand, car.model)?;
    Ok(())
}

pub fn delete<S: RecordStore, C: Clock, W: Write>(
    service: &InventoryService<S, C>,
    out: &mut W,
    position: usize,
) -> anyhow::Result<()> {
    let car = service.delete_car(position)?;
    writeln!(out, "Car removed from inventory: {} {}.", car.brand, car.model)?;
    Ok(())
}

pub fn sales<S: RecordStore, C: Clock, W: Write>(
    service: &InventoryService<S, C>,
    out: &mut W,
) -> anyhow::Result<()> {
    let sales = service.sales()?;
    render::sales_table(out, &sales)?;
    Ok(())
}
