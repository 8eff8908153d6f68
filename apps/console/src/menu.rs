//! # Menu Loop
//!
//! Numbered text menus over any `BufRead` / `Write` pair.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Menu Structure                                  │
//! │                                                                         │
//! │  Main: 1. Login  2. Register  3. Exit                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  ADMIN MENU                        EMPLOYEE MENU                        │
//! │  1. Manage Users                   1. Manage Products                   │
//! │  2. Manage Products                2. Manage Categories                 │
//! │  3. Manage Categories              3. Manage Stock Movements            │
//! │  4. Manage Stock Movements         4. Logout                            │
//! │  5. Logout                                                              │
//! │                                                                         │
//! │  Sub-menus hide the entries the role cannot use and number the rest.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! End of input behaves like "Exit": an open session is logged out first.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use serde::Serialize;
use stockroom_core::{Capability, Money, Product};
use stockroom_db::{Database, Session};
use tracing::debug;

use crate::commands::{auth, category, product, stock, user};
use crate::error::ApiError;
use crate::input::{self, Target};
use crate::state::{ConfigState, SessionState};

// =============================================================================
// Menu Items
// =============================================================================

/// One entry of a numbered menu.
trait MenuItem: Copy {
    fn label(&self) -> &'static str;

    /// Capability the entry needs; `None` means always shown.
    fn capability(&self) -> Option<Capability> {
        None
    }
}

#[derive(Debug, Clone, Copy)]
enum Area {
    Users,
    Products,
    Categories,
    Stock,
    Logout,
}

impl MenuItem for Area {
    fn label(&self) -> &'static str {
        match self {
            Area::Users => "Manage Users",
            Area::Products => "Manage Products",
            Area::Categories => "Manage Categories",
            Area::Stock => "Manage Stock Movements",
            Area::Logout => "Logout",
        }
    }

    fn capability(&self) -> Option<Capability> {
        match self {
            Area::Users => Some(Capability::ManageUsers),
            Area::Products | Area::Categories => Some(Capability::ViewCatalog),
            Area::Stock => Some(Capability::RecordMovements),
            Area::Logout => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum UserAction {
    List,
    Delete,
    Logs,
    Back,
}

impl MenuItem for UserAction {
    fn label(&self) -> &'static str {
        match self {
            UserAction::List => "List Users",
            UserAction::Delete => "Delete User",
            UserAction::Logs => "View User Logs",
            UserAction::Back => "Back",
        }
    }

    fn capability(&self) -> Option<Capability> {
        match self {
            UserAction::List | UserAction::Delete => Some(Capability::ManageUsers),
            UserAction::Logs => Some(Capability::ViewAuditLog),
            UserAction::Back => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ProductAction {
    List,
    Add,
    Update,
    Delete,
    Search,
    Lookup,
    ByCategory,
    Back,
}

impl MenuItem for ProductAction {
    fn label(&self) -> &'static str {
        match self {
            ProductAction::List => "List All Products",
            ProductAction::Add => "Add New Product",
            ProductAction::Update => "Update Product",
            ProductAction::Delete => "Delete Product",
            ProductAction::Search => "Search Product by Name",
            ProductAction::Lookup => "Find Product by ID or Name",
            ProductAction::ByCategory => "List Products in Category",
            ProductAction::Back => "Back",
        }
    }

    fn capability(&self) -> Option<Capability> {
        match self {
            ProductAction::Add | ProductAction::Update | ProductAction::Delete => {
                Some(Capability::EditCatalog)
            }
            ProductAction::Back => None,
            _ => Some(Capability::ViewCatalog),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum CategoryAction {
    List,
    Add,
    Rename,
    Delete,
    Search,
    Lookup,
    Back,
}

impl MenuItem for CategoryAction {
    fn label(&self) -> &'static str {
        match self {
            CategoryAction::List => "View All Categories",
            CategoryAction::Add => "Add New Category",
            CategoryAction::Rename => "Update Category",
            CategoryAction::Delete => "Delete Category",
            CategoryAction::Search => "Search Category by Name",
            CategoryAction::Lookup => "Find Category by ID or Name",
            CategoryAction::Back => "Back",
        }
    }

    fn capability(&self) -> Option<Capability> {
        match self {
            CategoryAction::Add | CategoryAction::Rename | CategoryAction::Delete => {
                Some(Capability::EditCatalog)
            }
            CategoryAction::Back => None,
            _ => Some(Capability::ViewCatalog),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum StockAction {
    List,
    Record,
    Between,
    ForProduct,
    Latest,
    ByType,
    NetChange,
    Back,
}

impl MenuItem for StockAction {
    fn label(&self) -> &'static str {
        match self {
            StockAction::List => "List All Stock Movements",
            StockAction::Record => "Record Stock Movement (IN/OUT)",
            StockAction::Between => "Get Stock Movements between Dates",
            StockAction::ForProduct => "Search Stock Movements by Product ID",
            StockAction::Latest => "Get Latest Movement for a Product",
            StockAction::ByType => "Filter Stock Movements by Type",
            StockAction::NetChange => "Net Stock Change for a Product",
            StockAction::Back => "Back",
        }
    }

    fn capability(&self) -> Option<Capability> {
        match self {
            StockAction::Back => None,
            _ => Some(Capability::RecordMovements),
        }
    }
}

const AREAS: [Area; 5] = [
    Area::Users,
    Area::Products,
    Area::Categories,
    Area::Stock,
    Area::Logout,
];

const USER_ACTIONS: [UserAction; 4] = [
    UserAction::List,
    UserAction::Delete,
    UserAction::Logs,
    UserAction::Back,
];

const PRODUCT_ACTIONS: [ProductAction; 8] = [
    ProductAction::List,
    ProductAction::Add,
    ProductAction::Update,
    ProductAction::Delete,
    ProductAction::Search,
    ProductAction::Lookup,
    ProductAction::ByCategory,
    ProductAction::Back,
];

const CATEGORY_ACTIONS: [CategoryAction; 7] = [
    CategoryAction::List,
    CategoryAction::Add,
    CategoryAction::Rename,
    CategoryAction::Delete,
    CategoryAction::Search,
    CategoryAction::Lookup,
    CategoryAction::Back,
];

const STOCK_ACTIONS: [StockAction; 8] = [
    StockAction::List,
    StockAction::Record,
    StockAction::Between,
    StockAction::ForProduct,
    StockAction::Latest,
    StockAction::ByType,
    StockAction::NetChange,
    StockAction::Back,
];

// =============================================================================
// Console
// =============================================================================

/// The interactive console.
///
/// ## Example
/// ```rust,ignore
/// let stdin = std::io::stdin();
/// let mut console = Console::new(db, config, stdin.lock(), std::io::stdout());
/// console.run().await?;
/// ```
pub struct Console<R, W> {
    db: Database,
    config: ConfigState,
    session: SessionState,
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(db: Database, config: ConfigState, input: R, out: W) -> Self {
        Console {
            db,
            config,
            session: SessionState::new(),
            input,
            out,
        }
    }

    /// Consumes the console, returning the output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs the main menu until "Exit" or end of input.
    pub async fn run(&mut self) -> io::Result<()> {
        let result = loop {
            match self.main_menu().await {
                Ok(true) => continue,
                Ok(false) => break Ok(()),
                Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                    debug!("End of input");
                    break Ok(());
                }
                Err(err) => break Err(err),
            }
        };

        if let Some(session) = self.session.end() {
            auth::logout(&self.db, &session).await;
        }
        self.out.flush()?;
        result
    }

    // -------------------------------------------------------------------------
    // Main menu
    // -------------------------------------------------------------------------

    async fn main_menu(&mut self) -> io::Result<bool> {
        writeln!(self.out, "\n1. Login\n2. Register\n3. Exit")?;
        match self.prompt("Choose an option: ")?.trim() {
            "1" => self.login().await?,
            "2" => self.register().await?,
            "3" => {
                writeln!(self.out, "Exiting...")?;
                return Ok(false);
            }
            _ => writeln!(self.out, "Invalid option")?,
        }
        Ok(true)
    }

    async fn login(&mut self) -> io::Result<()> {
        let username = self.prompt("Enter your username: ")?;
        let password = self.prompt("Enter your password: ")?;

        match auth::login(&self.db, &username, &password).await {
            Ok(session) => {
                writeln!(self.out, "You are logged in successfully as: {}", session.role)?;
                self.session.begin(session);
                self.session_menu().await
            }
            Err(err) => self.show_error(&err),
        }
    }

    async fn register(&mut self) -> io::Result<()> {
        let role = self.prompt("Choose role (admin/employee): ")?;
        let role = match input::parse_role(&role) {
            Ok(role) => role,
            Err(err) => return self.show_error(&err),
        };
        let username = self.prompt("New username: ")?;
        let password = self.prompt("New password: ")?;

        let result = auth::register(&self.db, &username, &password, role).await;
        self.confirm(result, |user| {
            format!("User '{}' registered successfully as {}.", user.username, user.role)
        })
    }

    // -------------------------------------------------------------------------
    // Session menus
    // -------------------------------------------------------------------------

    async fn session_menu(&mut self) -> io::Result<()> {
        while let Some(session) = self.session.current().cloned() {
            let title = if session.is_admin() {
                "ADMIN MENU"
            } else {
                "EMPLOYEE MENU"
            };
            match self.choose(title, &session, &AREAS)? {
                Some(Area::Users) => self.users_menu(&session).await?,
                Some(Area::Products) => self.products_menu(&session).await?,
                Some(Area::Categories) => self.categories_menu(&session).await?,
                Some(Area::Stock) => self.stock_menu(&session).await?,
                Some(Area::Logout) => {
                    if let Some(session) = self.session.end() {
                        auth::logout(&self.db, &session).await;
                    }
                    writeln!(self.out, "Logged out successfully.")?;
                }
                None => {}
            }
        }
        Ok(())
    }

    async fn users_menu(&mut self, session: &Session) -> io::Result<()> {
        loop {
            match self.choose("USER MENU", session, &USER_ACTIONS)? {
                Some(UserAction::List) => {
                    let result = user::list_users(&self.db, session).await;
                    self.show_list(result, "No users found.")?;
                }
                Some(UserAction::Delete) => {
                    let target = self.prompt("Enter username to delete: ")?;
                    let result = user::delete_user(&self.db, session, &target).await;
                    self.confirm(result, |_| {
                        format!("User '{}' deleted successfully.", target.trim())
                    })?;
                }
                Some(UserAction::Logs) => {
                    let result = user::view_logs(&self.db, session, self.config.log_limit).await;
                    self.show_list(result, "No user logs found.")?;
                }
                Some(UserAction::Back) => return Ok(()),
                None => {}
            }
        }
    }

    async fn products_menu(&mut self, session: &Session) -> io::Result<()> {
        loop {
            match self.choose("PRODUCT MENU", session, &PRODUCT_ACTIONS)? {
                Some(ProductAction::List) => {
                    let result = product::list_products(&self.db, session).await;
                    let total = match &result {
                        Ok(products) if !products.is_empty() && !self.config.json_output => {
                            Some(products.iter().map(Product::stock_value).sum::<Money>())
                        }
                        _ => None,
                    };
                    self.show_list(result, "No products found.")?;
                    if let Some(total) = total {
                        writeln!(self.out, "Total stock value: {total}")?;
                    }
                }
                Some(ProductAction::Add) => {
                    let name = self.prompt("Enter product name: ")?;
                    let category_id = self.prompt("Enter category ID: ")?;
                    let quantity = self.prompt("Enter quantity: ")?;
                    let price = self.prompt("Enter price: ")?;

                    let result = match input::new_product(&name, &category_id, &quantity, &price) {
                        Ok(new) => product::add_product(&self.db, session, new).await,
                        Err(err) => Err(err),
                    };
                    self.confirm(result, |p| format!("Product added successfully: {p}"))?;
                }
                Some(ProductAction::Update) => {
                    let target = self.prompt("Enter Product ID or Name to update: ")?;
                    let name = self.prompt("Enter new name (leave empty if no change): ")?;
                    let category_id =
                        self.prompt("Enter new category ID (leave empty if no change): ")?;
                    let quantity = self.prompt("Enter new quantity (leave empty if no change): ")?;
                    let price = self.prompt("Enter new price (leave empty if no change): ")?;

                    let parsed = Target::parse(&target).and_then(|target| {
                        input::product_update(&name, &category_id, &quantity, &price)
                            .map(|changes| (target, changes))
                    });
                    let result = match parsed {
                        Ok((target, changes)) => {
                            product::update_product(&self.db, session, &target, changes).await
                        }
                        Err(err) => Err(err),
                    };
                    self.confirm(result, |p| format!("Product updated: {p}"))?;
                }
                Some(ProductAction::Delete) => {
                    let target = self.prompt("Enter Product ID or Name to delete: ")?;
                    let result = match Target::parse(&target) {
                        Ok(target) => product::delete_product(&self.db, session, &target).await,
                        Err(err) => Err(err),
                    };
                    self.confirm(result, |deleted| {
                        if *deleted {
                            "Product deleted.".to_string()
                        } else {
                            "No matching product.".to_string()
                        }
                    })?;
                }
                Some(ProductAction::Search) => {
                    let term = self.prompt("Enter keyword to search: ")?;
                    let result = product::search_products(&self.db, session, &term).await;
                    self.show_list(result, "No products found.")?;
                }
                Some(ProductAction::Lookup) => {
                    let target = self.prompt("Enter Product ID or Name: ")?;
                    let result = match Target::parse(&target) {
                        Ok(target) => product::get_product(&self.db, session, &target).await,
                        Err(err) => Err(err),
                    };
                    self.show_item(result)?;
                }
                Some(ProductAction::ByCategory) => {
                    let category_id = self.prompt("Enter category ID: ")?;
                    let result = match input::parse_id(&category_id, "category ID") {
                        Ok(id) => product::products_in_category(&self.db, session, id).await,
                        Err(err) => Err(err),
                    };
                    self.show_list(result, "No products in this category.")?;
                }
                Some(ProductAction::Back) => return Ok(()),
                None => {}
            }
        }
    }

    async fn categories_menu(&mut self, session: &Session) -> io::Result<()> {
        loop {
            match self.choose("CATEGORY MENU", session, &CATEGORY_ACTIONS)? {
                Some(CategoryAction::List) => {
                    let result = category::list_categories(&self.db, session).await;
                    self.show_list(result, "No categories found.")?;
                }
                Some(CategoryAction::Add) => {
                    let name = self.prompt("Enter category name: ")?;
                    let result = category::add_category(&self.db, session, &name).await;
                    self.confirm(result, |c| format!("Added category successfully: {c}"))?;
                }
                Some(CategoryAction::Rename) => {
                    let target = self.prompt("Enter category ID or Name to update: ")?;
                    let new_name = self.prompt("Enter the new category name: ")?;
                    let result = match Target::parse(&target) {
                        Ok(target) => {
                            category::rename_category(&self.db, session, &target, &new_name).await
                        }
                        Err(err) => Err(err),
                    };
                    self.confirm(result, |c| format!("Category updated successfully: {c}"))?;
                }
                Some(CategoryAction::Delete) => {
                    let target = self.prompt("Enter category ID or Name to delete: ")?;
                    let result = match Target::parse(&target) {
                        Ok(target) => category::delete_category(&self.db, session, &target).await,
                        Err(err) => Err(err),
                    };
                    self.confirm(result, |deleted| {
                        if *deleted {
                            "Category deleted successfully.".to_string()
                        } else {
                            "No matching category.".to_string()
                        }
                    })?;
                }
                Some(CategoryAction::Search) => {
                    let term = self.prompt("Enter a keyword to search: ")?;
                    let result = category::search_categories(&self.db, session, &term).await;
                    self.show_list(result, "No categories found.")?;
                }
                Some(CategoryAction::Lookup) => {
                    let target = self.prompt("Enter category ID or Name: ")?;
                    let result = match Target::parse(&target) {
                        Ok(target) => category::get_category(&self.db, session, &target).await,
                        Err(err) => Err(err),
                    };
                    self.show_item(result)?;
                }
                Some(CategoryAction::Back) => return Ok(()),
                None => {}
            }
        }
    }

    async fn stock_menu(&mut self, session: &Session) -> io::Result<()> {
        loop {
            match self.choose("STOCK MOVEMENT MENU", session, &STOCK_ACTIONS)? {
                Some(StockAction::List) => {
                    let result = stock::list_movements(&self.db, session).await;
                    self.show_list(result, "No stock movements found.")?;
                }
                Some(StockAction::Record) => {
                    let product_id = self.prompt("Enter Product ID: ")?;
                    let change_type = self.prompt("Enter Stock Movement Type (IN/OUT): ")?;
                    let quantity = self.prompt("Enter Quantity: ")?;

                    let parsed = input::parse_id(&product_id, "Product ID").and_then(|id| {
                        let change_type = input::parse_change_type(&change_type)?;
                        let quantity = input::parse_quantity(&quantity)?;
                        Ok((id, change_type, quantity))
                    });
                    let result = match parsed {
                        Ok((id, change_type, quantity)) => {
                            stock::record_movement(&self.db, session, id, change_type, quantity)
                                .await
                        }
                        Err(err) => Err(err),
                    };
                    self.confirm(result, |m| format!("Stock movement recorded successfully: {m}"))?;
                }
                Some(StockAction::Between) => {
                    let start = self.prompt("Enter start date and time (yyyy-MM-dd HH:mm): ")?;
                    let end = self.prompt("Enter end date and time (yyyy-MM-dd HH:mm): ")?;

                    let parsed = input::parse_timestamp(&start)
                        .and_then(|start| input::parse_timestamp(&end).map(|end| (start, end)));
                    let result = match parsed {
                        Ok((start, end)) => stock::movements_between(&self.db, session, start, end).await,
                        Err(err) => Err(err),
                    };
                    self.show_list(result, "No stock movements found in this range.")?;
                }
                Some(StockAction::ForProduct) => {
                    let product_id = self.prompt("Enter Product ID to search: ")?;
                    let result = match input::parse_id(&product_id, "Product ID") {
                        Ok(id) => stock::movements_for_product(&self.db, session, id).await,
                        Err(err) => Err(err),
                    };
                    self.show_list(result, "No stock movements found for this product.")?;
                }
                Some(StockAction::Latest) => {
                    let product_id = self.prompt("Enter Product ID: ")?;
                    let result = match input::parse_id(&product_id, "Product ID") {
                        Ok(id) => stock::latest_movement(&self.db, session, id).await,
                        Err(err) => Err(err),
                    };
                    self.show_item(result)?;
                }
                Some(StockAction::ByType) => {
                    let change_type = self.prompt("Enter Stock Movement Type (IN/OUT): ")?;
                    let result = match input::parse_change_type(&change_type) {
                        Ok(change_type) => stock::movements_by_type(&self.db, session, change_type).await,
                        Err(err) => Err(err),
                    };
                    self.show_list(result, "No stock movements found.")?;
                }
                Some(StockAction::NetChange) => {
                    let product_id = self.prompt("Enter Product ID: ")?;
                    let result = match input::parse_id(&product_id, "Product ID") {
                        Ok(id) => stock::net_change(&self.db, session, id).await,
                        Err(err) => Err(err),
                    };
                    self.show_item(result)?;
                }
                Some(StockAction::Back) => return Ok(()),
                None => {}
            }
        }
    }

    // -------------------------------------------------------------------------
    // Terminal I/O
    // -------------------------------------------------------------------------

    /// Prints the entries `session` may use, numbered from 1, and reads a choice.
    fn choose<A: MenuItem>(
        &mut self,
        title: &str,
        session: &Session,
        items: &[A],
    ) -> io::Result<Option<A>> {
        let visible: Vec<A> = items
            .iter()
            .copied()
            .filter(|item| item.capability().map_or(true, |cap| session.can(cap)))
            .collect();

        writeln!(self.out, "\n----- {title} -----\n")?;
        for (n, item) in visible.iter().enumerate() {
            writeln!(self.out, "{}. {}", n + 1, item.label())?;
        }

        let choice = self.prompt("Choose an option: ")?;
        let picked = choice
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| visible.get(index).copied());

        if picked.is_none() {
            writeln!(self.out, "Invalid option.")?;
        }
        Ok(picked)
    }

    /// Prints `label` and reads one line without its terminator.
    ///
    /// End of input is reported as [`io::ErrorKind::UnexpectedEof`].
    fn prompt(&mut self, label: &str) -> io::Result<String> {
        write!(self.out, "{label}")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
    }

    fn show_list<T: Serialize + Display>(
        &mut self,
        result: Result<Vec<T>, ApiError>,
        empty: &str,
    ) -> io::Result<()> {
        match result {
            Ok(items) if self.config.json_output => self.write_json(&items),
            Ok(items) if items.is_empty() => writeln!(self.out, "{empty}"),
            Ok(items) => {
                for item in &items {
                    writeln!(self.out, "{item}")?;
                }
                Ok(())
            }
            Err(err) => self.show_error(&err),
        }
    }

    fn show_item<T: Serialize + Display>(&mut self, result: Result<T, ApiError>) -> io::Result<()> {
        match result {
            Ok(item) if self.config.json_output => self.write_json(&item),
            Ok(item) => writeln!(self.out, "{item}"),
            Err(err) => self.show_error(&err),
        }
    }

    fn confirm<T>(
        &mut self,
        result: Result<T, ApiError>,
        message: impl FnOnce(&T) -> String,
    ) -> io::Result<()> {
        match result {
            Ok(value) => writeln!(self.out, "{}", message(&value)),
            Err(err) => self.show_error(&err),
        }
    }

    fn show_error(&mut self, err: &ApiError) -> io::Result<()> {
        if self.config.json_output {
            self.write_json(err)
        } else {
            writeln!(self.out, "Error: {err}")
        }
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::from)?;
        writeln!(self.out, "{json}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::Role;
    use stockroom_db::DbConfig;

    async fn run_script(db: Database, config: ConfigState, script: &str) -> String {
        let mut console = Console::new(db, config, script.as_bytes(), Vec::new());
        console.run().await.unwrap();
        String::from_utf8(console.into_output()).unwrap()
    }

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.access().register("boss", "pw", Role::Admin).await.unwrap();
        db.access().register("clerk", "pw", Role::Employee).await.unwrap();
        db
    }

    #[test]
    fn test_employee_sees_no_edit_entries() {
        let employee = Session {
            username: "clerk".to_string(),
            role: Role::Employee,
        };
        let labels: Vec<&str> = PRODUCT_ACTIONS
            .iter()
            .filter(|a| a.capability().map_or(true, |c| employee.can(c)))
            .map(|a| a.label())
            .collect();
        assert_eq!(
            labels,
            vec![
                "List All Products",
                "Search Product by Name",
                "Find Product by ID or Name",
                "List Products in Category",
                "Back"
            ]
        );
    }

    #[tokio::test]
    async fn test_exit_and_invalid_option() {
        let db = seeded().await;
        let out = run_script(db, ConfigState::default(), "9\n3\n").await;
        assert!(out.contains("Invalid option"));
        assert!(out.contains("Exiting..."));
    }

    #[tokio::test]
    async fn test_bad_login_stays_on_main_menu() {
        let db = seeded().await;
        let out = run_script(db, ConfigState::default(), "1\nboss\nwrong\n3\n").await;
        assert!(out.contains("Error: Invalid username or password"));
        assert!(!out.contains("ADMIN MENU"));
    }

    #[tokio::test]
    async fn test_end_of_input_logs_out() {
        let db = seeded().await;
        let audit = db.audit();
        run_script(db, ConfigState::default(), "1\nclerk\npw\n").await;

        let actions: Vec<String> = audit
            .list_recent(2)
            .await
            .unwrap()
            .into_iter()
            .map(|log| log.action)
            .collect();
        assert_eq!(actions, vec!["LOGOUT", "LOGIN SUCCESS"]);
    }

    #[tokio::test]
    async fn test_json_listing() {
        let db = seeded().await;
        db.categories().create("Tools").await.unwrap();
        let config = ConfigState {
            json_output: true,
            ..ConfigState::default()
        };

        // login, Manage Categories (2 for employees), list, back (4), logout, exit
        let out = run_script(db, config, "1\nclerk\npw\n2\n1\n4\n4\n3\n").await;
        assert!(out.contains("\"name\": \"Tools\""));
        assert!(out.contains("Logged out successfully."));
    }
}
