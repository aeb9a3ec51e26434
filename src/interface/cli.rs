use std::io::{BufRead, Write};

use crate::domain::{Contact, NewContact};
use crate::service::ContactService;

/// Interactive console front-end: a numbered menu driving the same service the
/// HTTP front-end uses, one operation at a time.
pub struct Cli {
    service: ContactService,
}

impl Cli {
    pub fn new(service: ContactService) -> Self {
        Self { service }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        println!("========================================");
        println!("   Contact Management System - CLI");
        println!("========================================");

        loop {
            println!();
            println!("1. List contacts");
            println!("2. Create contact");
            println!("3. Update contact");
            println!("4. Delete contact");
            println!("0. Exit");

            let choice = prompt("\nChoice: ")?;
            match choice.as_str() {
                "1" => self.list_contacts().await,
                "2" => self.create_contact().await?,
                "3" => self.update_contact().await?,
                "4" => self.delete_contact().await?,
                "0" => {
                    println!("Goodbye!");
                    return Ok(());
                }
                _ => println!("Invalid choice"),
            }
        }
    }

    async fn list_contacts(&self) {
        match self.service.get_all().await {
            Ok(contacts) => {
                println!("\nContacts:");
                for contact in contacts {
                    println!("  [{}] {} - {}", contact.id, contact.full_name(), contact.email);
                }
            }
            Err(err) => println!("Error: {err}"),
        }
    }

    async fn create_contact(&self) -> anyhow::Result<()> {
        let contact = NewContact {
            first_name: prompt("First Name: ")?,
            last_name: prompt("Last Name: ")?,
            email: prompt("Email: ")?,
        };

        match self.service.create(contact).await {
            Ok(created) => println!("Contact created with ID {}", created.id),
            Err(err) => println!("Error: {err}"),
        }
        Ok(())
    }

    async fn update_contact(&self) -> anyhow::Result<()> {
        let raw_id = prompt("Contact ID: ")?;
        let Ok(id) = raw_id.parse::<i64>() else {
            println!("Invalid ID: {raw_id}");
            return Ok(());
        };

        let contact = Contact {
            id,
            first_name: prompt("First Name: ")?,
            last_name: prompt("Last Name: ")?,
            email: prompt("Email: ")?,
        };

        match self.service.update_and_notify(contact).await {
            Ok(_) => println!("Contact updated"),
            Err(err) => println!("Error: {err}"),
        }
        Ok(())
    }

    async fn delete_contact(&self) -> anyhow::Result<()> {
        let raw_id = prompt("Contact ID: ")?;
        let Ok(id) = raw_id.parse::<i64>() else {
            println!("Invalid ID: {raw_id}");
            return Ok(());
        };

        match self.service.delete(id).await {
            Ok(()) => println!("Contact deleted"),
            Err(err) => println!("Error: {err}"),
        }
        Ok(())
    }
}

fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{label}");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
