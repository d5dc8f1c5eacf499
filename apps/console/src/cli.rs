//! # Command Line
//!
//! A scriptable front end over the screen controllers.
//!
//! ```text
//! deli-console [--config PATH] list <clientes|productos|inventario|ventas> [--search TEXT] [--json]
//! deli-console [--config PATH] report [--json]
//! deli-console [--config PATH] forecast [--demo]
//! deli-console [--config PATH] delete <resource> <ID>
//! ```
//!
//! Tables go to stdout; toasts and alerts go to stderr.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use deli_core::{Customer, Entity, InventoryRecord, Product, RecordId, Sale};

use crate::notify::Notification;
use crate::screens::Screen;
use crate::Console;

/// Deli admin console.
#[derive(Parser, Debug)]
#[command(name = "deli-console", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the records of a resource.
    List {
        resource: Resource,

        /// Keep only records matching this text (case-insensitive).
        #[arg(long)]
        search: Option<String>,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Show the aggregated sales report.
    Report {
        #[arg(long)]
        json: bool,
    },

    /// Project next month's sales.
    Forecast {
        /// Use the built-in demo series instead of the backend report.
        #[arg(long)]
        demo: bool,
    },

    /// Delete one record.
    Delete { resource: Resource, id: RecordId },
}

/// Backend resources, named by their path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Resource {
    Clientes,
    Productos,
    Inventario,
    Ventas,
}

/// Runs one command against the backend.
pub async fn run(cli: Cli, console: &Console) -> anyhow::Result<()> {
    match cli.command {
        Command::List {
            resource,
            search,
            json,
        } => {
            let search = search.unwrap_or_default();
            match resource {
                Resource::Clientes => {
                    list(console.customers(), &search, json, customer_row).await
                }
                Resource::Productos => list(console.products(), &search, json, product_row).await,
                Resource::Inventario => {
                    let mut screen = console.inventory();
                    let loaded = screen.load().await;
                    print_notifications(screen.take_notifications());
                    loaded.context("could not load inventory")?;
                    render(screen.screen(), &search, json, inventory_row)
                }
                Resource::Ventas => {
                    let mut screen = console.sales();
                    let loaded = screen.load().await;
                    print_notifications(screen.take_notifications());
                    loaded.context("could not load sales")?;
                    render(screen.screen(), &search, json, sale_row)
                }
            }
        }

        Command::Report { json } => {
            let mut dashboard = console.dashboard();
            let loaded = dashboard.load().await.cloned();
            print_notifications(dashboard.take_notifications());
            let view = loaded.context("could not load the report")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
                return Ok(());
            }

            let report = &view.report;
            println!("Ingresos  {}", report.ingresos);
            println!("Egresos   {}", report.egresos);
            println!("Utilidad  {}", report.utilidad);
            println!();
            for point in &report.ventas_mensuales {
                println!("{:<4} {:>12.2}", point.mes, point.total);
            }
            if !report.productos.is_empty() {
                println!();
                for product in &report.productos {
                    println!("{:<30} {:>6}", product.producto, product.total_vendido);
                }
            }
            Ok(())
        }

        Command::Forecast { demo } => {
            let mut dashboard = console.dashboard();
            let projection = if demo {
                dashboard.forecast_demo()
            } else {
                let loaded = dashboard
                    .load()
                    .await
                    .map(|view| view.forecast.clone().map(|f| (f, view.overlay.clone())));
                match loaded {
                    Ok(projection) => projection,
                    Err(e) => {
                        print_notifications(dashboard.take_notifications());
                        return Err(anyhow::Error::new(e).context("could not load the report"));
                    }
                }
            };
            print_notifications(dashboard.take_notifications());

            if let Some((forecast, overlay)) = projection {
                let label = overlay.last().map_or("?", |p| p.mes.as_str());
                println!(
                    "{label}: {:.2} ({:+.2}%, {:?})",
                    forecast.projected_value, forecast.percent_change, forecast.direction
                );
            }
            Ok(())
        }

        Command::Delete { resource, id } => match resource {
            Resource::Clientes => delete(console.customers(), id).await,
            Resource::Productos => delete(console.products(), id).await,
            Resource::Inventario => delete(console.screen::<InventoryRecord>(), id).await,
            Resource::Ventas => delete(console.screen::<Sale>(), id).await,
        },
    }
}

async fn list<E: Entity + Serialize>(
    mut screen: Screen<E>,
    search: &str,
    json: bool,
    row: fn(&E) -> String,
) -> anyhow::Result<()> {
    let loaded = screen.load().await;
    print_notifications(screen.take_notifications());
    loaded.with_context(|| format!("could not load {}", E::RESOURCE))?;
    render(&screen, search, json, row)
}

fn render<E: Entity + Serialize>(
    screen: &Screen<E>,
    search: &str,
    json: bool,
    row: fn(&E) -> String,
) -> anyhow::Result<()> {
    let records = deli_core::filter_records(screen.records(), search);

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for record in records {
            println!("{}", row(record));
        }
    }
    Ok(())
}

async fn delete<E: Entity>(mut screen: Screen<E>, id: RecordId) -> anyhow::Result<()> {
    let result = screen.delete(id).await;
    print_notifications(screen.take_notifications());
    if let Err(e) = result {
        bail!("{} {id} was not deleted: {e}", E::LABEL);
    }
    Ok(())
}

fn print_notifications(notifications: Vec<Notification>) {
    for notification in notifications {
        eprintln!("{notification}");
    }
}

// =============================================================================
// Rows
// =============================================================================

fn customer_row(c: &Customer) -> String {
    format!(
        "{:>5}  {:<28} {:<12} {}",
        c.id_cliente, c.nombre, c.telefono, c.correo
    )
}

fn product_row(p: &Product) -> String {
    format!(
        "{:>5}  {:<28} {:<16} {:>12} {}",
        p.id_producto,
        p.nombre,
        p.categoria,
        p.precio_venta.to_string(),
        p.estado
    )
}

fn inventory_row(r: &InventoryRecord) -> String {
    format!(
        "{:>5}  {:<28} {:>6} {:>6} {:>6} {:>6}",
        r.id_inventario, r.nombre_producto, r.cantidad_inicial, r.entradas, r.salidas, r.stock_actual
    )
}

fn sale_row(s: &Sale) -> String {
    let fecha = s
        .date()
        .map_or_else(|| s.fecha.clone(), |d| d.to_string());
    format!(
        "{:>5}  {:<10} {:<24} {:<13} {:<9} {:>12}",
        s.id_venta,
        fecha,
        s.cliente,
        s.metodo_pago.to_string(),
        s.estado.to_string(),
        s.total.to_string()
    )
}
