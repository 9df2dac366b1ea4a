//! Plain-text tables for the panels.

use std::io::{self, Write};

use carlot_inventory::{CAR_HEADERS, CarRecord};
use carlot_sales::{SALE_HEADERS, SaleRecord};

/// Cars with the store position each row can be acted on by.
pub fn cars_table<W: Write>(out: &mut W, rows: &[(usize, CarRecord)]) -> io::Result<()> {
    let mut headers = vec!["#"];
    headers.extend(CAR_HEADERS);

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|(position, car)| {
            let mut row = vec![position.to_string()];
            row.extend(car.columns().map(str::to_string));
            row
        })
        .collect();

    table(out, &headers, &cells)
}

pub fn sales_table<W: Write>(out: &mut W, sales: &[SaleRecord]) -> io::Result<()> {
    let cells: Vec<Vec<String>> = sales.iter().map(|s| s.columns().to_vec()).collect();
    table(out, &SALE_HEADERS, &cells)
}

/// One car as `Field: value` lines, the way the edit form shows it.
pub fn car_detail<W: Write>(out: &mut W, position: usize, car: &CarRecord) -> io::Result<()> {
    writeln!(out, "Position: {position}")?;
    for (header, value) in CAR_HEADERS.iter().zip(car.columns()) {
        writeln!(out, "{header}: {value}")?;
    }
    Ok(())
}

fn table<W: Write>(out: &mut W, headers: &[&str], rows: &[Vec<String>]) -> io::Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_row(out, &widths, headers.iter().copied())?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(out, &widths, rule.iter().map(String::as_str))?;
    for row in rows {
        write_row(out, &widths, row.iter().map(String::as_str))?;
    }
    Ok(())
}

fn write_row<'a, W: Write>(
    out: &mut W,
    widths: &[usize],
    cells: impl Iterator<Item = &'a str>,
) -> io::Result<()> {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    writeln!(out, "{}", line.join("  ").trim_end())
}
